//! # cjs-to-esm 插件
//!
//! 将 CommonJS 的 `require` / `module.exports` 改写为 ES module 的 `import` / `export`。
//!
//! ## 改写规则
//! ```text
//! require('foo');                       -> import 'foo';
//! const foo = require('foo');           -> import * as foo from 'foo';
//! const { a, b: c } = require('foo');   -> import { a, b as c } from 'foo';
//! const x = require('foo').bar;         -> import * as _mod$1 from 'foo';
//!                                          const x = _mod$1.bar;
//! exports.a = b;                        -> export { b as a };
//! exports.a = 123;                      -> export const a = 123;
//! module.exports = { a, b: c };         -> export { a, c as b };
//! module.exports = foo;                 -> export { foo };
//!                                          export default foo;
//! module.exports = <expr>;              -> export default <expr>;  (附带警告)
//! ```
//!
//! 改写以行为单位进行，只有顶层（无缩进）语句会被识别为 import/export；
//! 其余位置出现的 `require('...')` 统一走 `_mod$N` 兜底规则。
//! 生成的 import 按出现顺序提升到文件顶部（shebang 之后）。
//! 字符串、模板字符串和注释里的 `require(` 不参与改写，块注释与模板可以跨行。
//! 同一个名字被导出两次视为错误，输出沿用输入的换行符（`\n` 或 `\r\n`）。
//!
//! ## 依赖关系
//! - 被 `transform/source.rs` 调用
//! - 使用 `regex` crate

use regex::{Captures, Regex};
use std::collections::HashSet;

/// 一次改写的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub code: String,
    pub warnings: Vec<String>,
}

/// 导出语句的改写结果
struct ExportRewrite {
    lines: Vec<String>,
    consumed: usize,
    names: Vec<String>,
}

/// 行首所处的词法状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lex {
    Code,
    BlockComment,
    Template,
}

/// cjs-to-esm 改写器
pub struct CjsToEsm {
    require_stmt: Regex,
    require_ident: Regex,
    require_destructure: Regex,
    require_inline: Regex,
    require_any: Regex,
    module_exports: Regex,
    named_exports: Regex,
    ident: Regex,
    object_entry: Regex,
}

impl Default for CjsToEsm {
    fn default() -> Self {
        Self::new()
    }
}

impl CjsToEsm {
    pub fn new() -> Self {
        const LITERAL: &str = r#"('[^'\\]*'|"[^"\\]*")"#;
        Self {
            require_stmt: Regex::new(&format!(r"^require\(\s*{}\s*\)\s*;?\s*$", LITERAL))
                .unwrap(),
            require_ident: Regex::new(&format!(
                r"^(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*require\(\s*{}\s*\)\s*;?\s*$",
                LITERAL
            ))
            .unwrap(),
            require_destructure: Regex::new(&format!(
                r"^(?:const|let|var)\s*\{{([^}}]*)\}}\s*=\s*require\(\s*{}\s*\)\s*;?\s*$",
                LITERAL
            ))
            .unwrap(),
            require_inline: Regex::new(&format!(
                r"(^|[^\w$.])require\(\s*{}\s*\)",
                LITERAL
            ))
            .unwrap(),
            require_any: Regex::new(r"(^|[^\w$.])require\s*\(").unwrap(),
            module_exports: Regex::new(r"^module\.exports\s*=([^=].*)$").unwrap(),
            named_exports: Regex::new(r"^(?:module\.)?exports\.([A-Za-z_$][\w$]*)\s*=([^=].*)$")
                .unwrap(),
            ident: Regex::new(r"^[A-Za-z_$][\w$]*$").unwrap(),
            object_entry: Regex::new(r"^([A-Za-z_$][\w$]*)(?:\s*:\s*([A-Za-z_$][\w$]*))?$")
                .unwrap(),
        }
    }

    /// 改写整段源码
    ///
    /// 失败时返回带行号的原因，调用方负责补上文件路径。
    pub fn rewrite(&self, source: &str) -> Result<Rewrite, String> {
        let newline = if source.contains("\r\n") { "\r\n" } else { "\n" };
        let lines: Vec<&str> = source.lines().collect();
        let mut head: Vec<String> = Vec::new();
        let mut imports: Vec<String> = Vec::new();
        let mut body: Vec<String> = Vec::with_capacity(lines.len());
        let mut warnings = Vec::new();
        let mut exported: HashSet<String> = HashSet::new();
        let mut counter = 0usize;
        let mut state = Lex::Code;

        let mut i = 0;
        if lines.first().is_some_and(|l| l.starts_with("#!")) {
            head.push(lines[0].to_string());
            i = 1;
        }

        while i < lines.len() {
            let line = lines[i];
            let line_no = i + 1;
            let (mask, next) = scan_line(line, state);

            let statement_start = state == Lex::Code
                && mask.first() == Some(&true)
                && !line.starts_with(char::is_whitespace);
            if statement_start {
                if let Some(import) = self.import_for_statement(line) {
                    imports.push(import);
                    state = next;
                    i += 1;
                    continue;
                }

                if let Some(export) = self.rewrite_exports(&lines, i, &mut warnings) {
                    for name in export.names {
                        if !exported.insert(name.clone()) {
                            return Err(format!(
                                "line {}: '{}' is exported more than once",
                                line_no, name
                            ));
                        }
                    }
                    for rewritten in export.lines {
                        body.push(self.replace_inline_requires(
                            &rewritten,
                            Lex::Code,
                            line_no,
                            &mut counter,
                            &mut imports,
                        )?);
                    }
                    for consumed in &lines[i..i + export.consumed] {
                        state = scan_line(consumed, state).1;
                    }
                    i += export.consumed;
                    continue;
                }
            }

            body.push(self.replace_inline_requires(
                line,
                state,
                line_no,
                &mut counter,
                &mut imports,
            )?);
            state = next;
            i += 1;
        }

        let mut output: Vec<String> = head;
        output.extend(imports);
        output.extend(body);

        let mut code = output.join(newline);
        if source.ends_with('\n') {
            code.push_str(newline);
        }

        Ok(Rewrite { code, warnings })
    }

    /// 规则 1-3：整行 require 语句直接变为 import
    fn import_for_statement(&self, line: &str) -> Option<String> {
        if let Some(caps) = self.require_stmt.captures(line) {
            return Some(format!("import {};", &caps[1]));
        }

        if let Some(caps) = self.require_ident.captures(line) {
            return Some(format!("import * as {} from {};", &caps[1], &caps[2]));
        }

        let caps = self.require_destructure.captures(line)?;
        let mut specifiers = Vec::new();
        for entry in caps[1].split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let parts = self.object_entry.captures(entry)?;
            match parts.get(2) {
                Some(local) if local.as_str() != &parts[1] => {
                    specifiers.push(format!("{} as {}", &parts[1], local.as_str()))
                }
                _ => specifiers.push(parts[1].to_string()),
            }
        }
        if specifiers.is_empty() {
            return Some(format!("import {};", &caps[2]));
        }
        Some(format!(
            "import {{ {} }} from {};",
            specifiers.join(", "),
            &caps[2]
        ))
    }

    /// 规则 5-9：导出语句，返回替换行、消耗的源码行数和导出的名字
    fn rewrite_exports(
        &self,
        lines: &[&str],
        start: usize,
        warnings: &mut Vec<String>,
    ) -> Option<ExportRewrite> {
        let line = lines[start];
        let line_no = start + 1;
        let single_line = bracket_depth(line) == 0;
        let one = |text: String, names: Vec<String>| ExportRewrite {
            lines: vec![text],
            consumed: 1,
            names,
        };

        if let Some(caps) = self.named_exports.captures(line) {
            let name = &caps[1];
            let rest = caps[2].trim();
            let value = rest.trim_end_matches(';').trim_end();
            let names = vec![name.to_string()];

            if name == "default" {
                return Some(one(format!("export default {}", rest), names));
            }
            if single_line && self.ident.is_match(value) {
                let spec = if value == name {
                    name.to_string()
                } else {
                    format!("{} as {}", value, name)
                };
                return Some(one(format!("export {{ {} }};", spec), names));
            }
            return Some(one(format!("export const {} = {}", name, rest), names));
        }

        let caps = self.module_exports.captures(line)?;
        let rest = caps[1].trim();
        let value = rest.trim_end_matches(';').trim_end();

        if rest.starts_with('{') {
            if let Some((statement, consumed)) = gather_statement(lines, start) {
                if let Some(entries) = self.object_specifiers(&statement) {
                    let specifiers: Vec<String> = entries
                        .iter()
                        .map(|(local, name)| {
                            if local == name {
                                name.clone()
                            } else {
                                format!("{} as {}", local, name)
                            }
                        })
                        .collect();
                    return Some(ExportRewrite {
                        lines: vec![format!("export {{ {} }};", specifiers.join(", "))],
                        consumed,
                        names: entries.into_iter().map(|(_, name)| name).collect(),
                    });
                }
            }
        } else if single_line && self.ident.is_match(value) {
            return Some(ExportRewrite {
                lines: vec![
                    format!("export {{ {} }};", value),
                    format!("export default {};", value),
                ],
                consumed: 1,
                names: vec![value.to_string(), "default".to_string()],
            });
        }

        warnings.push(format!(
            "line {}: module.exports assigned a value, emitted as a default export",
            line_no
        ));
        Some(one(
            format!("export default {}", rest),
            vec!["default".to_string()],
        ))
    }

    /// 解析 `module.exports = { ... }` 的对象字面量，仅接受简写或 `key: ident`
    ///
    /// 返回 (本地名, 导出名) 列表。
    fn object_specifiers(&self, statement: &str) -> Option<Vec<(String, String)>> {
        let open = statement.find('{')?;
        let close = statement.rfind('}')?;
        let tail = statement[close + 1..].trim();
        if close < open || !(tail.is_empty() || tail == ";") {
            return None;
        }

        let mut entries = Vec::new();
        for entry in statement[open + 1..close]
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
        {
            let parts = self.object_entry.captures(entry)?;
            let name = parts[1].to_string();
            let local = parts.get(2).map_or(name.clone(), |m| m.as_str().to_string());
            entries.push((local, name));
        }
        Some(entries)
    }

    /// 规则 4：兜底，把代码里的 `require('x')` 替换成 `_mod$N`
    ///
    /// `state` 是该行开头的词法状态，字符串与注释内的匹配原样保留。
    fn replace_inline_requires(
        &self,
        line: &str,
        state: Lex,
        line_no: usize,
        counter: &mut usize,
        imports: &mut Vec<String>,
    ) -> Result<String, String> {
        let (mask, _) = scan_line(line, state);

        let replaced = self.require_inline.replace_all(line, |caps: &Captures| {
            if !is_code_at(&mask, caps) {
                return caps[0].to_string();
            }
            *counter += 1;
            let local = format!("_mod${}", counter);
            imports.push(format!("import * as {} from {};", local, &caps[2]));
            format!("{}{}", &caps[1], local)
        });

        let (mask, _) = scan_line(&replaced, state);
        if self
            .require_any
            .captures_iter(&replaced)
            .any(|caps| is_code_at(&mask, &caps))
        {
            return Err(format!(
                "line {}: require() with a non-literal argument cannot be converted to an import",
                line_no
            ));
        }

        Ok(replaced.into_owned())
    }
}

/// 匹配到的 `require` 是否位于代码中（第 1 组之后即 `require` 的起点）
fn is_code_at(mask: &[bool], caps: &Captures) -> bool {
    let at = caps.get(1).map_or(0, |m| m.end());
    mask.get(at).copied().unwrap_or(false)
}

/// 扫描一行，标出属于代码的字节（字符串、模板字符串和注释之外）
///
/// 返回掩码和行尾的词法状态。普通字符串不跨行，块注释与模板字符串可以跨行；
/// 模板里的 `${}` 整体当作字符串处理。
fn scan_line(line: &str, start: Lex) -> (Vec<bool>, Lex) {
    let bytes = line.as_bytes();
    let mut mask = vec![false; bytes.len()];
    let mut state = start;
    let mut quote: Option<u8> = None;

    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match state {
            Lex::BlockComment => {
                if bytes[i..].starts_with(b"*/") {
                    state = Lex::Code;
                    i += 2;
                    continue;
                }
            }
            Lex::Template => {
                if b == b'\\' {
                    i += 2;
                    continue;
                }
                if b == b'`' {
                    state = Lex::Code;
                }
            }
            Lex::Code => match quote {
                Some(q) => {
                    if b == b'\\' {
                        i += 2;
                        continue;
                    }
                    if b == q {
                        quote = None;
                    }
                }
                None => match b {
                    b'\'' | b'"' => quote = Some(b),
                    b'`' => state = Lex::Template,
                    b'/' if bytes.get(i + 1) == Some(&b'/') => break,
                    b'/' if bytes.get(i + 1) == Some(&b'*') => {
                        state = Lex::BlockComment;
                        i += 2;
                        continue;
                    }
                    _ => mask[i] = true,
                },
            },
        }
        i += 1;
    }

    (mask, state)
}

/// 只保留掩码标记为代码的部分
fn code_text(line: &str, mask: &[bool]) -> String {
    let bytes: Vec<u8> = line
        .bytes()
        .zip(mask)
        .filter(|(_, code)| **code)
        .map(|(b, _)| b)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// 从 `start` 行开始收集一条完整语句（括号配平为止），只保留代码部分
fn gather_statement(lines: &[&str], start: usize) -> Option<(String, usize)> {
    let mut depth = 0i32;
    let mut state = Lex::Code;
    let mut statement = String::new();
    for (offset, line) in lines[start..].iter().enumerate() {
        let (mask, next) = scan_line(line, state);
        state = next;
        let code = code_text(line, &mask);
        depth += depth_of(&code);
        statement.push_str(&code);
        statement.push('\n');
        if depth <= 0 && state == Lex::Code {
            return Some((statement, offset + 1));
        }
    }
    None
}

/// 计算一行代码的括号净深度，忽略字符串与注释
fn bracket_depth(line: &str) -> i32 {
    let (mask, _) = scan_line(line, Lex::Code);
    depth_of(&code_text(line, &mask))
}

fn depth_of(code: &str) -> i32 {
    let mut depth = 0;
    for c in code.chars() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ => {}
        }
    }
    depth
}
