use crate::config::CodeGenConfig;
use std::fmt;

/// Utility that incrementally constructs Java source code with indentation handling.
#[derive(Debug, Default, Clone)]
pub struct JavaSourceBuilder {
    content: String,
    indent_level: usize,
    indent: String,
}

impl JavaSourceBuilder {
    pub fn new(indent: String) -> Self {
        Self {
            content: String::new(),
            indent_level: 0,
            indent,
        }
    }

    /// Blank lines are written without indentation.
    pub fn push_line(&mut self, line: &str) {
        if !line.is_empty() {
            self.push_indent();
            self.content.push_str(line);
        }
        self.content.push('\n');
    }

    pub fn push_lines(&mut self, text: &str) {
        for line in text.lines() {
            self.push_line(line);
        }
    }

    pub fn push_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.content.push_str(&self.indent);
        }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    pub fn build(self) -> String {
        self.content
    }
}

/// How the generated class relates to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Implements,
    Extends,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Implements => f.write_str("implements"),
            Relation::Extends => f.write_str("extends"),
        }
    }
}

/// A generated compilation unit before it is rendered to text.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedUnit {
    /// Package of the target; empty for the default package.
    pub package: String,
    pub class_name: String,
    pub relation: Relation,
    /// Source-form name of the implemented or extended type.
    pub target: String,
    pub constructor: Option<String>,
    pub methods: Vec<String>,
}

impl GeneratedUnit {
    pub fn to_source(&self, config: &CodeGenConfig) -> String {
        let mut builder = JavaSourceBuilder::new(config.indent.clone());

        if !self.package.is_empty() {
            builder.push_line(&format!("package {};", self.package));
            builder.push_line("");
        }

        builder.push_line(&format!(
            "public class {} {} {} {{",
            self.class_name, self.relation, self.target
        ));
        builder.indent();

        let members = self.constructor.iter().chain(self.methods.iter());
        for (index, member) in members.enumerate() {
            if index > 0 {
                builder.push_line("");
            }
            builder.push_lines(member);
        }

        builder.dedent();
        builder.push_line("}");
        builder.build()
    }
}
