#[derive(Debug, Clone, PartialEq)]
pub enum PrefixOp {
    Not,
    Neg,
}

impl PrefixOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            PrefixOp::Not => "!",
            PrefixOp::Neg => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    /// Backtick call: ``a `min` b``, an infix invocation of a named function.
    Call(String),
}

impl InfixOp {
    pub fn symbol(&self) -> String {
        match self {
            InfixOp::Add => "+".into(),
            InfixOp::Sub => "-".into(),
            InfixOp::Mul => "*".into(),
            InfixOp::Div => "/".into(),
            InfixOp::Mod => "%".into(),
            InfixOp::Eq => "==".into(),
            InfixOp::NotEq => "!=".into(),
            InfixOp::Lt => "<".into(),
            InfixOp::LtEq => "<=".into(),
            InfixOp::Gt => ">".into(),
            InfixOp::GtEq => ">=".into(),
            InfixOp::And => "&&".into(),
            InfixOp::Or => "||".into(),
            InfixOp::Call(name) => format!("`{}`", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchCase {
    pub pattern: Expression,
    pub guard: Option<Expression>,
    pub body: Box<Statement>,
    pub trailing_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Integer literal in its raw lexical form (underscore separators kept).
    Integer(String),
    /// Decimal literal in its raw lexical form.
    Decimal(String),
    /// String literal carrying unescaped content.
    Str(String),
    Boolean(bool),
    Nil,
    /// The `_` placeholder.
    Placeholder,
    Identifier(String),
    /// Rest binding inside a pattern: `..name`.
    RestIdentifier(String),
    Let {
        pattern: Box<Expression>,
        value: Box<Expression>,
        mutable: bool,
    },
    Assign {
        target: Box<Expression>,
        value: Box<Expression>,
    },
    List(Vec<Expression>),
    Set(Vec<Expression>),
    Dictionary(Vec<(Expression, Expression)>),
    ExclusiveRange {
        from: Box<Expression>,
        to: Box<Expression>,
    },
    InclusiveRange {
        from: Box<Expression>,
        to: Box<Expression>,
    },
    UnboundedRange {
        from: Box<Expression>,
    },
    /// Lambda. The body is always a `Statement::Block`, even for `|x| x + 1`.
    Function {
        parameters: Vec<Expression>,
        body: Box<Statement>,
    },
    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    Prefix {
        operator: PrefixOp,
        right: Box<Expression>,
    },
    Infix {
        left: Box<Expression>,
        operator: InfixOp,
        right: Box<Expression>,
    },
    If {
        condition: Box<Expression>,
        consequence: Box<Statement>,
        alternative: Option<Box<Statement>>,
    },
    Match {
        subject: Box<Expression>,
        cases: Vec<MatchCase>,
    },
    /// Pipe chain: `initial |> f1 |> f2`.
    FunctionThread {
        initial: Box<Expression>,
        functions: Vec<Expression>,
    },
    /// Composition chain: `f1 >> f2 >> f3`.
    FunctionComposition(Vec<Expression>),
    Index {
        left: Box<Expression>,
        index: Box<Expression>,
    },
    Spread(Box<Expression>),
    ListPattern(Vec<Expression>),
    DictionaryPattern(Vec<Expression>),
    /// `key: value` inside a dictionary pattern.
    DictionaryEntryPattern {
        key: Box<Expression>,
        value: Box<Expression>,
    },
    /// An operator used as a value: `reduce(+)`.
    OperatorRef(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    Return(Expression),
    Break(Expression),
    Comment(String),
    Section {
        name: String,
        attributes: Vec<String>,
        body: Program,
    },
    Expression(Expression),
    Block(Program),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    /// Set when the source had a blank line immediately before this statement.
    pub preceded_by_blank_line: bool,
    /// A comment token that followed the statement on the same source line.
    pub trailing_comment: Option<String>,
}

impl Statement {
    pub fn new(kind: StatementKind) -> Self {
        Statement {
            kind,
            preceded_by_blank_line: false,
            trailing_comment: None,
        }
    }
}

pub type Program = Vec<Statement>;
