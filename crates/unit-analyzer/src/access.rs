//! Ordered read/bind events for Python statements.
//!
//! The collector walks one statement and emits every name it reads and every name it
//! binds, in evaluation order: a simple statement reads everything before it binds its
//! targets, a compound statement handles its header before its body. Function, class,
//! lambda and comprehension bodies are separate scopes and only surface their free names.

use std::collections::HashSet;
use tree_sitter::Node;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Access {
    Read(String),
    Bind(String),
}

/// `target = "literal"` seen in module scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StringAssignment {
    pub target: String,
    pub value: String,
    pub line: usize,
}

/// Name brought into scope by an import declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportBinding {
    pub module: String,
    /// `None` for wildcard imports
    pub name: Option<String>,
}

pub(crate) struct AccessCollector<'a> {
    source: &'a [u8],
    /// Imports and direct top-level definitions are seeded by the caller
    module_scope: bool,
    depth: usize,
    events: Vec<Access>,
    string_assignments: Vec<StringAssignment>,
}

impl<'a> AccessCollector<'a> {
    pub fn module(source: &'a [u8]) -> Self {
        Self {
            source,
            module_scope: true,
            depth: 0,
            events: Vec::new(),
            string_assignments: Vec::new(),
        }
    }

    fn nested(source: &'a [u8]) -> Self {
        Self {
            module_scope: false,
            ..Self::module(source)
        }
    }

    pub fn into_parts(self) -> (Vec<Access>, Vec<StringAssignment>) {
        (self.events, self.string_assignments)
    }

    fn text(&self, node: Node<'_>) -> &'a str {
        node.utf8_text(self.source).unwrap_or_default()
    }

    fn read(&mut self, name: &str) {
        if !name.is_empty() {
            self.events.push(Access::Read(name.to_string()));
        }
    }

    fn bind_all(&mut self, names: Vec<String>) {
        self.events
            .extend(names.into_iter().filter(|n| !n.is_empty()).map(Access::Bind));
    }

    /// Reads that are not satisfied by anything bound in this scope
    fn free_names(&self, locals: &[String]) -> Vec<String> {
        let mut bound: HashSet<&str> = locals.iter().map(String::as_str).collect();
        for event in &self.events {
            if let Access::Bind(name) = event {
                bound.insert(name.as_str());
            }
        }

        let mut seen = HashSet::new();
        let mut free = Vec::new();
        for event in &self.events {
            if let Access::Read(name) = event {
                if !bound.contains(name.as_str()) && seen.insert(name.as_str()) {
                    free.push(name.clone());
                }
            }
        }
        free
    }

    fn binds_definitions(&self) -> bool {
        !(self.module_scope && self.depth == 0)
    }

    pub fn statement(&mut self, node: Node<'_>) {
        match node.kind() {
            "expression_statement" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    match child.kind() {
                        "assignment" => self.assignment(child),
                        "augmented_assignment" => self.augmented_assignment(child),
                        _ => self.expression(child),
                    }
                }
            }
            "import_statement" | "import_from_statement" => {
                if !self.module_scope {
                    let names = import_bindings(node, self.source)
                        .into_iter()
                        .filter_map(|binding| binding.name)
                        .collect();
                    self.bind_all(names);
                }
            }
            "function_definition" => self.function_definition(node),
            "class_definition" => self.class_definition(node),
            "decorated_definition" => {
                let definition = node.child_by_field_name("definition");
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    if Some(child) == definition {
                        self.statement(child);
                    } else {
                        self.expression(child);
                    }
                }
            }
            "for_statement" => {
                if let Some(right) = node.child_by_field_name("right") {
                    self.expression(right);
                }
                if let Some(left) = node.child_by_field_name("left") {
                    let mut binds = Vec::new();
                    self.target(left, &mut binds);
                    self.bind_all(binds);
                }
                self.optional_suite(node.child_by_field_name("body"));
                self.optional_suite(node.child_by_field_name("alternative"));
            }
            "while_statement" => {
                if let Some(condition) = node.child_by_field_name("condition") {
                    self.expression(condition);
                }
                self.optional_suite(node.child_by_field_name("body"));
                self.optional_suite(node.child_by_field_name("alternative"));
            }
            "if_statement" | "elif_clause" => {
                if let Some(condition) = node.child_by_field_name("condition") {
                    self.expression(condition);
                }
                self.optional_suite(node.child_by_field_name("consequence"));
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    if matches!(child.kind(), "elif_clause" | "else_clause") {
                        self.statement(child);
                    }
                }
            }
            "else_clause" | "finally_clause" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.suite(child);
                }
            }
            "with_statement" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    match child.kind() {
                        "with_clause" => self.with_clause(child),
                        "block" => self.suite(child),
                        _ => {}
                    }
                }
            }
            "try_statement" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    match child.kind() {
                        "block" => self.suite(child),
                        "except_clause" | "except_group_clause" => self.except_clause(child),
                        "else_clause" | "finally_clause" => self.statement(child),
                        _ => {}
                    }
                }
            }
            "future_import_statement" | "global_statement" | "nonlocal_statement"
            | "pass_statement" | "break_statement" | "continue_statement" | "comment" => {}
            _ => self.expression(node),
        }
    }

    fn optional_suite(&mut self, node: Option<Node<'_>>) {
        if let Some(node) = node {
            self.suite(node);
        }
    }

    fn suite(&mut self, node: Node<'_>) {
        if node.kind() == "block" {
            self.depth += 1;
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                self.statement(child);
            }
            self.depth -= 1;
        } else {
            self.statement(node);
        }
    }

    fn assignment(&mut self, node: Node<'_>) {
        let mut targets = Vec::new();
        let mut current = Some(node);
        let mut value = None;

        // `a = b = value` nests the second assignment in the right-hand side
        while let Some(assignment) = current {
            if let Some(annotation) = assignment.child_by_field_name("type") {
                self.expression(annotation);
            }
            let right = assignment.child_by_field_name("right");
            if right.is_none() {
                // Bare annotation binds nothing
                break;
            }
            if let Some(left) = assignment.child_by_field_name("left") {
                targets.push(left);
            }
            match right {
                Some(next) if next.kind() == "assignment" => current = Some(next),
                other => {
                    value = other;
                    current = None;
                }
            }
        }

        if let Some(value) = value {
            self.expression(value);
        }

        let mut binds = Vec::new();
        for target in &targets {
            self.target(*target, &mut binds);
        }

        if self.module_scope {
            if let Some(literal) = value.and_then(|v| string_value(v, self.source)) {
                for target in &targets {
                    if target.kind() == "identifier" {
                        self.string_assignments.push(StringAssignment {
                            target: self.text(*target).to_string(),
                            value: literal.clone(),
                            line: node.start_position().row + 1,
                        });
                    }
                }
            }
        }

        self.bind_all(binds);
    }

    fn augmented_assignment(&mut self, node: Node<'_>) {
        let left = node.child_by_field_name("left");
        if let Some(left) = left {
            self.expression(left);
        }
        if let Some(right) = node.child_by_field_name("right") {
            self.expression(right);
        }
        if let Some(left) = left {
            if left.kind() == "identifier" {
                self.bind_all(vec![self.text(left).to_string()]);
            }
        }
    }

    /// Collect names bound by an assignment target; non-binding parts are reads
    fn target(&mut self, node: Node<'_>, binds: &mut Vec<String>) {
        match node.kind() {
            "identifier" => binds.push(self.text(node).to_string()),
            "pattern_list" | "tuple_pattern" | "list_pattern" | "tuple" | "list"
            | "parenthesized_expression" | "list_splat_pattern" | "list_splat"
            | "as_pattern_target" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.target(child, binds);
                }
            }
            _ => self.expression(node),
        }
    }

    fn with_clause(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        for item in node.named_children(&mut cursor) {
            if item.kind() != "with_item" {
                continue;
            }
            if let Some(value) = item.child_by_field_name("value") {
                if value.kind() == "as_pattern" {
                    self.as_pattern(value);
                } else {
                    self.expression(value);
                }
            }
            if let Some(alias) = item.child_by_field_name("alias") {
                let mut binds = Vec::new();
                self.target(alias, &mut binds);
                self.bind_all(binds);
            }
        }
    }

    fn as_pattern(&mut self, node: Node<'_>) {
        let alias = node.child_by_field_name("alias");
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if Some(child) != alias {
                self.expression(child);
            }
        }
        if let Some(alias) = alias {
            let mut binds = Vec::new();
            self.target(alias, &mut binds);
            self.bind_all(binds);
        }
    }

    fn except_clause(&mut self, node: Node<'_>) {
        let mut after_as = false;
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        for child in children {
            match child.kind() {
                "as" => after_as = true,
                "block" => self.suite(child),
                "as_pattern" => self.as_pattern(child),
                _ if child.is_named() => {
                    if after_as {
                        let mut binds = Vec::new();
                        self.target(child, &mut binds);
                        self.bind_all(binds);
                    } else {
                        self.expression(child);
                    }
                }
                _ => {}
            }
        }
    }

    fn function_definition(&mut self, node: Node<'_>) {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();

        let mut locals = vec![name.clone()];
        if let Some(parameters) = node.child_by_field_name("parameters") {
            self.parameters(parameters, &mut locals);
        }
        if let Some(return_type) = node.child_by_field_name("return_type") {
            self.expression(return_type);
        }

        let mut body = AccessCollector::nested(self.source);
        body.optional_suite(node.child_by_field_name("body"));
        for free in body.free_names(&locals) {
            self.read(&free);
        }

        if self.binds_definitions() {
            self.bind_all(vec![name]);
        }
    }

    fn class_definition(&mut self, node: Node<'_>) {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();

        if let Some(superclasses) = node.child_by_field_name("superclasses") {
            self.expression(superclasses);
        }

        let mut body = AccessCollector::nested(self.source);
        body.optional_suite(node.child_by_field_name("body"));
        for free in body.free_names(std::slice::from_ref(&name)) {
            self.read(&free);
        }

        if self.binds_definitions() {
            self.bind_all(vec![name]);
        }
    }

    /// Parameter names go to `names`; defaults and annotations are reads here
    fn parameters(&mut self, node: Node<'_>, names: &mut Vec<String>) {
        let mut cursor = node.walk();
        for param in node.named_children(&mut cursor) {
            match param.kind() {
                "identifier" => names.push(self.text(param).to_string()),
                "default_parameter" | "typed_default_parameter" => {
                    if let Some(name) = param.child_by_field_name("name") {
                        collect_identifiers(name, self.source, names);
                    }
                    if let Some(annotation) = param.child_by_field_name("type") {
                        self.expression(annotation);
                    }
                    if let Some(value) = param.child_by_field_name("value") {
                        self.expression(value);
                    }
                }
                "typed_parameter" => {
                    let mut inner = param.walk();
                    for child in param.named_children(&mut inner) {
                        if child.kind() == "type" {
                            self.expression(child);
                        } else {
                            collect_identifiers(child, self.source, names);
                        }
                    }
                }
                "keyword_separator" | "positional_separator" | "comment" => {}
                _ => collect_identifiers(param, self.source, names),
            }
        }
    }

    fn lambda(&mut self, node: Node<'_>) {
        let mut locals = Vec::new();
        if let Some(parameters) = node.child_by_field_name("parameters") {
            self.parameters(parameters, &mut locals);
        }
        let mut body = AccessCollector::nested(self.source);
        if let Some(expr) = node.child_by_field_name("body") {
            body.expression(expr);
        }
        for free in body.free_names(&locals) {
            self.read(&free);
        }
    }

    fn comprehension(&mut self, node: Node<'_>) {
        let mut scope = AccessCollector::nested(self.source);
        let mut locals = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "for_in_clause" {
                if let Some(left) = child.child_by_field_name("left") {
                    scope.target(left, &mut locals);
                }
                let mut inner = child.walk();
                for right in child.children_by_field_name("right", &mut inner) {
                    scope.expression(right);
                }
            } else {
                scope.expression(child);
            }
        }
        for free in scope.free_names(&locals) {
            self.read(&free);
        }
    }

    /// Every identifier in read position
    fn expression(&mut self, node: Node<'_>) {
        match node.kind() {
            "identifier" => {
                let name = self.text(node);
                self.read(name);
            }
            "attribute" => {
                if let Some(object) = node.child_by_field_name("object") {
                    self.expression(object);
                }
            }
            "keyword_argument" => {
                if let Some(value) = node.child_by_field_name("value") {
                    self.expression(value);
                }
            }
            "named_expression" => {
                if let Some(value) = node.child_by_field_name("value") {
                    self.expression(value);
                }
                if let Some(name) = node.child_by_field_name("name") {
                    self.bind_all(vec![self.text(name).to_string()]);
                }
            }
            "lambda" => self.lambda(node),
            "list_comprehension" | "set_comprehension" | "dictionary_comprehension"
            | "generator_expression" => self.comprehension(node),
            "comment" | "string_content" | "escape_sequence" => {}
            _ => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.expression(child);
                }
            }
        }
    }
}

fn collect_identifiers(node: Node<'_>, source: &[u8], out: &mut Vec<String>) {
    if node.kind() == "identifier" {
        out.push(node.utf8_text(source).unwrap_or_default().to_string());
        return;
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_identifiers(child, source, out);
    }
}

/// Names bound by an `import` / `from ... import` statement
pub(crate) fn import_bindings(node: Node<'_>, source: &[u8]) -> Vec<ImportBinding> {
    let text = |n: Node<'_>| n.utf8_text(source).unwrap_or_default().to_string();
    let mut bindings = Vec::new();
    let mut cursor = node.walk();

    match node.kind() {
        "import_statement" => {
            for child in node.children_by_field_name("name", &mut cursor) {
                match child.kind() {
                    "aliased_import" => bindings.push(ImportBinding {
                        module: child
                            .child_by_field_name("name")
                            .map(text)
                            .unwrap_or_default(),
                        name: child.child_by_field_name("alias").map(text),
                    }),
                    _ => {
                        // `import a.b` binds `a`
                        let module = text(child);
                        let name = module.split('.').next().map(str::to_string);
                        bindings.push(ImportBinding { module, name });
                    }
                }
            }
        }
        "import_from_statement" => {
            let module = node
                .child_by_field_name("module_name")
                .map(text)
                .unwrap_or_default();
            let mut names = node.children_by_field_name("name", &mut cursor).peekable();
            if names.peek().is_none() {
                bindings.push(ImportBinding { module, name: None });
            } else {
                for child in names {
                    let name = match child.kind() {
                        "aliased_import" => child.child_by_field_name("alias").map(text),
                        _ => text(child).rsplit('.').next().map(str::to_string),
                    };
                    bindings.push(ImportBinding {
                        module: module.clone(),
                        name,
                    });
                }
            }
        }
        _ => {}
    }
    bindings
}

/// Literal value of a plain (possibly f-) string node
fn string_value(node: Node<'_>, source: &[u8]) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }

    let mut value = String::new();
    let mut has_content_nodes = false;
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "string_content" => {
                has_content_nodes = true;
                value.push_str(child.utf8_text(source).unwrap_or_default());
            }
            "interpolation" => {
                has_content_nodes = true;
                value.push_str("{}");
            }
            _ => {}
        }
    }

    if !has_content_nodes {
        let raw = node.utf8_text(source).unwrap_or_default();
        value = raw
            .trim_start_matches(|c: char| c.is_ascii_alphabetic())
            .trim_matches(|c| c == '"' || c == '\'')
            .to_string();
    }
    Some(value)
}
