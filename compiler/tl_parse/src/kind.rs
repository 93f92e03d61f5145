//! Node kinds and field roles of the syntax tree.
//!
//! Kind names follow the tree-sitter convention (`snake_case` for named
//! nodes, `ERROR` for error nodes) so feature code can match on the same
//! strings editors and grammars use.

use tl_lexer::TokenKind;

/// Kind of a syntax tree node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Program,
    Block,

    // Statements
    VarDeclaration,
    VarDeclarators,
    Var,
    Attribute,
    VarAssignment,
    AssignmentVariables,
    Expressions,
    FunctionStatement,
    RecordDeclaration,
    InterfaceDeclaration,
    EnumDeclaration,
    TypeDeclaration,
    ReturnStatement,
    IfStatement,
    ElseifBlock,
    ElseBlock,
    WhileStatement,
    RepeatStatement,
    NumericForStatement,
    GenericForStatement,
    DoStatement,
    BreakStatement,
    GotoStatement,
    LabelStatement,

    // Function pieces
    Parameters,
    Parameter,
    ReturnType,
    Typeargs,
    Typearg,

    // Expressions
    Identifier,
    Number,
    String,
    Nil,
    True,
    False,
    Varargs,
    FunctionCall,
    Arguments,
    Index,
    MethodIndex,
    BracketIndex,
    ParenthesizedExpression,
    BinaryOp,
    UnaryOp,
    CastExpression,
    IsExpression,
    TableConstructor,
    Field,
    AnonFunction,

    // Types
    TypeAnnotation,
    SimpleType,
    TypeIndex,
    TypeUnion,
    TableType,
    FunctionType,
    TypeList,

    // Record / enum bodies
    RecordBody,
    RecordField,
    RecordArrayType,
    InterfaceList,
    WhereClause,
    EnumBody,

    /// Keyword or punctuation leaf.
    Token(TokenKind),

    Error,
}

impl SyntaxKind {
    /// The tree-sitter style name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            SyntaxKind::Program => "program",
            SyntaxKind::Block => "block",
            SyntaxKind::VarDeclaration => "var_declaration",
            SyntaxKind::VarDeclarators => "var_declarators",
            SyntaxKind::Var => "var",
            SyntaxKind::Attribute => "attribute",
            SyntaxKind::VarAssignment => "var_assignment",
            SyntaxKind::AssignmentVariables => "assignment_variables",
            SyntaxKind::Expressions => "expressions",
            SyntaxKind::FunctionStatement => "function_statement",
            SyntaxKind::RecordDeclaration => "record_declaration",
            SyntaxKind::InterfaceDeclaration => "interface_declaration",
            SyntaxKind::EnumDeclaration => "enum_declaration",
            SyntaxKind::TypeDeclaration => "type_declaration",
            SyntaxKind::ReturnStatement => "return_statement",
            SyntaxKind::IfStatement => "if_statement",
            SyntaxKind::ElseifBlock => "elseif_block",
            SyntaxKind::ElseBlock => "else_block",
            SyntaxKind::WhileStatement => "while_statement",
            SyntaxKind::RepeatStatement => "repeat_statement",
            SyntaxKind::NumericForStatement => "numeric_for_statement",
            SyntaxKind::GenericForStatement => "generic_for_statement",
            SyntaxKind::DoStatement => "do_statement",
            SyntaxKind::BreakStatement => "break_statement",
            SyntaxKind::GotoStatement => "goto_statement",
            SyntaxKind::LabelStatement => "label_statement",
            SyntaxKind::Parameters => "parameters",
            SyntaxKind::Parameter => "parameter",
            SyntaxKind::ReturnType => "return_type",
            SyntaxKind::Typeargs => "typeargs",
            SyntaxKind::Typearg => "typearg",
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::Number => "number",
            SyntaxKind::String => "string",
            SyntaxKind::Nil => "nil",
            SyntaxKind::True => "true",
            SyntaxKind::False => "false",
            SyntaxKind::Varargs => "varargs",
            SyntaxKind::FunctionCall => "function_call",
            SyntaxKind::Arguments => "arguments",
            SyntaxKind::Index => "index",
            SyntaxKind::MethodIndex => "method_index",
            SyntaxKind::BracketIndex => "bracket_index",
            SyntaxKind::ParenthesizedExpression => "parenthesized_expression",
            SyntaxKind::BinaryOp => "binary_op",
            SyntaxKind::UnaryOp => "unary_op",
            SyntaxKind::CastExpression => "cast_expression",
            SyntaxKind::IsExpression => "is_expression",
            SyntaxKind::TableConstructor => "table_constructor",
            SyntaxKind::Field => "field",
            SyntaxKind::AnonFunction => "anon_function",
            SyntaxKind::TypeAnnotation => "type_annotation",
            SyntaxKind::SimpleType => "simple_type",
            SyntaxKind::TypeIndex => "type_index",
            SyntaxKind::TypeUnion => "type_union",
            SyntaxKind::TableType => "table_type",
            SyntaxKind::FunctionType => "function_type",
            SyntaxKind::TypeList => "type_list",
            SyntaxKind::RecordBody => "record_body",
            SyntaxKind::RecordField => "record_field",
            SyntaxKind::RecordArrayType => "record_array_type",
            SyntaxKind::InterfaceList => "interface_list",
            SyntaxKind::WhereClause => "where_clause",
            SyntaxKind::EnumBody => "enum_body",
            SyntaxKind::Token(kind) => kind.describe().trim_matches('\''),
            SyntaxKind::Error => "ERROR",
        }
    }

    /// Named nodes are everything except keyword and punctuation leaves.
    #[inline]
    pub fn is_named(self) -> bool {
        !matches!(self, SyntaxKind::Token(_))
    }

    /// Kinds that may start a member-access chain.
    #[inline]
    pub fn is_chain(self) -> bool {
        matches!(
            self,
            SyntaxKind::Index
                | SyntaxKind::MethodIndex
                | SyntaxKind::BracketIndex
                | SyntaxKind::TypeIndex
        )
    }

    /// Leaf kind for a token the parser keeps as a named node.
    pub(crate) fn leaf(token: TokenKind) -> SyntaxKind {
        match token {
            TokenKind::Name => SyntaxKind::Identifier,
            TokenKind::Number => SyntaxKind::Number,
            TokenKind::String => SyntaxKind::String,
            TokenKind::Nil => SyntaxKind::Nil,
            TokenKind::True => SyntaxKind::True,
            TokenKind::False => SyntaxKind::False,
            TokenKind::Ellipsis => SyntaxKind::Varargs,
            TokenKind::UnterminatedString | TokenKind::Unknown => SyntaxKind::Error,
            other => SyntaxKind::Token(other),
        }
    }
}

/// Role of a child within its parent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Object,
    Key,
    Value,
    CalledObject,
    Arguments,
    Type,
    Condition,
    Body,
    Left,
    Operator,
    Right,
    Operand,
    Parameters,
    ReturnType,
    Typeargs,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Object => "object",
            Field::Key => "key",
            Field::Value => "value",
            Field::CalledObject => "called_object",
            Field::Arguments => "arguments",
            Field::Type => "type",
            Field::Condition => "condition",
            Field::Body => "body",
            Field::Left => "left",
            Field::Operator => "operator",
            Field::Right => "right",
            Field::Operand => "operand",
            Field::Parameters => "parameters",
            Field::ReturnType => "return_type",
            Field::Typeargs => "typeargs",
        }
    }
}
