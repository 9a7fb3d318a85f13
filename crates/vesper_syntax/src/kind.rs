/// The kind of a non-terminal node in the syntax tree.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    SourceFile,

    // Declarations
    ImportDecl,
    VariableDecl,
    FunctionDecl,
    StructDecl,
    EnumDecl,
    EnumCaseDecl,
    ExtensionDecl,
    Attribute,
    DeclModifier,
    ParameterClause,
    Parameter,
    ReturnClause,
    GenericParameterClause,
    GenericParameter,
    GenericWhereClause,
    Initializer,
    TypeAnnotation,

    // Statements
    CodeBlock,
    MemberBlock,
    IfStmt,
    GuardStmt,
    ForInStmt,
    WhereClause,
    ReturnStmt,
    BreakStmt,
    ContinueStmt,

    // Expressions
    IdentifierExpr,
    LiteralExpr,
    PrefixExpr,
    BinaryExpr,
    MemberExpr,
    CallExpr,
    ArgumentClause,
    Argument,
    ClosureExpr,
    ClosureSignature,
    TupleExpr,
    ArrayExpr,
    ListElement,

    // Types
    NamedType,
    MemberType,
    OptionalType,
    ArrayType,
    DictionaryType,
    TupleType,
    FunctionType,
    GenericArgumentClause,
}

impl SyntaxKind {
    pub const fn is_decl(self) -> bool {
        matches!(
            self,
            SyntaxKind::ImportDecl
                | SyntaxKind::VariableDecl
                | SyntaxKind::FunctionDecl
                | SyntaxKind::StructDecl
                | SyntaxKind::EnumDecl
                | SyntaxKind::EnumCaseDecl
                | SyntaxKind::ExtensionDecl
        )
    }

    pub const fn is_expr(self) -> bool {
        matches!(
            self,
            SyntaxKind::IdentifierExpr
                | SyntaxKind::LiteralExpr
                | SyntaxKind::PrefixExpr
                | SyntaxKind::BinaryExpr
                | SyntaxKind::MemberExpr
                | SyntaxKind::CallExpr
                | SyntaxKind::ClosureExpr
                | SyntaxKind::TupleExpr
                | SyntaxKind::ArrayExpr
        )
    }

    pub const fn is_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::NamedType
                | SyntaxKind::MemberType
                | SyntaxKind::OptionalType
                | SyntaxKind::ArrayType
                | SyntaxKind::DictionaryType
                | SyntaxKind::TupleType
                | SyntaxKind::FunctionType
        )
    }
}
