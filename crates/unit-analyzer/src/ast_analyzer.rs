use crate::access::{import_bindings, Access, AccessCollector};
use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, Result};
use crate::literals::PathHeuristic;
use crate::magics::strip_magics;
use crate::scope::UnitScope;
use crate::types::{HardcodedLiteral, SymbolFacts};
use nb2prod_protocol::CodeUnit;
use std::borrow::Cow;
use tree_sitter::{Node, Parser};

/// Tree-sitter backed symbol analysis of single notebook units
pub struct UnitAnalyzer {
    config: AnalyzerConfig,
    parser: Parser,
    paths: PathHeuristic,
}

impl UnitAnalyzer {
    /// Create a new analyzer with the Python grammar loaded
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;

        let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| AnalyzerError::tree_sitter(format!("Failed to set language: {e}")))?;

        let paths = PathHeuristic::new(&config.data_file_extensions)?;

        Ok(Self {
            config,
            parser,
            paths,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze one unit. Never fails: non-code, blank and unparsable units yield empty facts.
    pub fn analyze(&mut self, unit: &CodeUnit) -> SymbolFacts {
        if !unit.is_analyzable() {
            return SymbolFacts::empty(unit.index);
        }
        self.analyze_source(unit.index, &unit.source)
    }

    /// Analyze raw Python source as the unit at `index`
    pub fn analyze_source(&mut self, index: usize, source: &str) -> SymbolFacts {
        match self.try_analyze(index, source) {
            Ok(facts) => facts,
            Err(e) => {
                log::debug!("Unit {index} yields no symbols: {e}");
                SymbolFacts::empty(index)
            }
        }
    }

    fn try_analyze(&mut self, index: usize, source: &str) -> Result<SymbolFacts> {
        let prepared = if self.config.strip_magics {
            match strip_magics(source) {
                Some(prepared) => prepared,
                None => {
                    log::debug!("Unit {index} is a cell magic, skipping");
                    return Ok(SymbolFacts::empty(index));
                }
            }
        } else {
            Cow::Borrowed(source)
        };

        let tree = self
            .parser
            .parse(prepared.as_ref(), None)
            .ok_or_else(|| AnalyzerError::parse("Failed to parse source code"))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(AnalyzerError::SyntaxError {
                line: first_error_line(root),
            });
        }

        let bytes = prepared.as_bytes();
        let statements = top_level_statements(root);
        let mut scope = UnitScope::new(index, &self.config);

        // Seed the scope with imports and definitions before walking
        for (position, statement) in statements.iter().enumerate() {
            collect_imports(*statement, bytes, position, &mut scope);
        }
        for (position, statement) in statements.iter().enumerate() {
            if let Some(name) = definition_name(*statement, bytes) {
                scope.definition(name, position);
            }
        }

        for (position, statement) in statements.iter().enumerate() {
            let mut collector = AccessCollector::module(bytes);
            collector.statement(*statement);
            let (events, assignments) = collector.into_parts();

            for event in events {
                match event {
                    Access::Read(name) => scope.read(&name),
                    Access::Bind(name) => scope.bind(&name, position),
                }
            }

            for assignment in assignments {
                if self.paths.looks_like_path(&assignment.value) {
                    scope.hardcoded(HardcodedLiteral {
                        target: assignment.target,
                        value: assignment.value,
                        line: assignment.line,
                    });
                }
            }
        }

        Ok(scope.finish())
    }
}

fn top_level_statements(root: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = root.walk();
    root.named_children(&mut cursor)
        .filter(|node| node.kind() != "comment")
        .collect()
}

/// Imports of a top-level statement, descending into compound statements but not into
/// function or class bodies
fn collect_imports(node: Node<'_>, source: &[u8], position: usize, scope: &mut UnitScope<'_>) {
    match node.kind() {
        "import_statement" | "import_from_statement" => {
            for binding in import_bindings(node, source) {
                scope.import(&binding.module, binding.name.as_deref(), position);
            }
        }
        "function_definition" | "class_definition" | "decorated_definition" | "lambda" => {}
        _ => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect_imports(child, source, position, scope);
            }
        }
    }
}

fn definition_name<'s>(node: Node<'_>, source: &'s [u8]) -> Option<&'s str> {
    let definition = match node.kind() {
        "function_definition" | "class_definition" => node,
        "decorated_definition" => node.child_by_field_name("definition")?,
        _ => return None,
    };
    definition
        .child_by_field_name("name")
        .and_then(|name| name.utf8_text(source).ok())
}

fn first_error_line(node: Node<'_>) -> usize {
    if node.is_error() || node.is_missing() {
        return node.start_position().row + 1;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .find(|child| child.has_error())
        .map_or(node.start_position().row + 1, first_error_line)
}
