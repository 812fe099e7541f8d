//! Makefile line grammar
//!
//! Pure templates: each function returns the text of one line (without the trailing newline and without the
//! leading tab of recipe lines). The emission steps decide *what* to write; this module decides *how it is spelled*.

use mkgen_core::lang::conventions;
use mkgen_core::lang::variables::{self, AssignOp, VariableId};

use crate::config::GeneratorConfig;

pub const ELSE: &str = "else";
pub const ENDIF: &str = "endif";

/// `   NAME     op value`, aligned per `layout`. No trailing space when `value` is empty.
pub fn assignment(layout: &GeneratorConfig, id: VariableId, op: AssignOp, value: &str) -> String {
    let mut line = format!(
        "{:indent$}{:<width$} {}",
        "",
        variables::as_str(id),
        op.as_str(),
        indent = layout.variable_indent,
        width = layout.variable_width,
    );
    if !value.is_empty() {
        line.push(' ');
        line.push_str(value);
    }
    line
}

/// `ifeq ($(CONFIG),<name>)`
pub fn config_conditional(configuration: &str) -> String {
    format!("ifeq ({},{})", variables::reference(VariableId::Config), configuration)
}

/// `ifeq (posix, $(SHELLTYPE))`
pub fn posix_shell_conditional() -> String {
    format!(
        "ifeq ({}, {})",
        conventions::SHELL_POSIX,
        variables::reference(VariableId::ShellType)
    )
}

/// `<target>: <prereq> <prereq> ...` (or `<target>:` with none)
pub fn rule(target: &str, prerequisites: &[&str]) -> String {
    if prerequisites.is_empty() {
        format!("{}:", target)
    } else {
        format!("{}: {}", target, prerequisites.join(" "))
    }
}

/// `.PHONY: <target> ...`
pub fn phony(targets: &[&str]) -> String {
    rule(".PHONY", targets)
}

/// `@<command>`: a recipe command make does not echo
pub fn silent(command: &str) -> String {
    format!("@{}", command)
}

/// `@echo <message>`
pub fn echo(message: &str) -> String {
    silent(&format!("echo {}", message))
}

/// `NAME := \`: opening line of a backslash-continued list
pub fn list_open(id: VariableId) -> String {
    format!("{} {} \\", variables::as_str(id), AssignOp::Immediate.as_str())
}

/// `<item> \`: one continued list entry (written tab-indented)
pub fn list_item(item: &str) -> String {
    format!("{} \\", item)
}

/// ` -D "<symbol>"`: one define appended to CPPFLAGS
pub fn define_flag(symbol: &str) -> String {
    format!(" -D \"{}\"", symbol)
}

/// `-include $(OBJECTS:%.o=%.d)`
pub fn include_dependencies() -> String {
    format!(
        "-include $({}:%.{}=%.{})",
        variables::as_str(VariableId::Objects),
        conventions::OBJECT_EXT,
        conventions::DEPENDENCY_EXT
    )
}
