use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Source {
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub type_name: Option<String>,
    pub value: Option<Expr>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub parameters: Vec<String>,
    pub statements: Vec<Stmt>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Expression(Expr),
    Declaration(Declaration),
    Assignment(Assignment),
    If(If),
    For(For),
    While(While),
    Return(Option<Expr>),
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub type_name: Option<String>,
    pub value: Option<Expr>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub receiver: Expr,
    pub value: Expr,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct If {
    pub condition: Expr,
    pub then_statements: Vec<Stmt>,
    pub else_statements: Vec<Stmt>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct For {
    pub name: String,
    pub value: Expr,
    pub statements: Vec<Stmt>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct While {
    pub condition: Expr,
    pub statements: Vec<Stmt>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(Literal),
    Group(Box<Expr>),
    Binary(Binary),
    Access(Access),
    Function(Function),
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Nil,
    Bool(bool),
    Integer(BigInt),
    Decimal(BigDecimal),
    Character(char),
    String(String),
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Binary {
    pub operator: String,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

/// A field or variable access; variables have no receiver.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Access {
    pub receiver: Option<Box<Expr>>,
    pub name: String,
}

/// A function call; method calls carry the receiver.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub receiver: Option<Box<Expr>>,
    pub name: String,
    pub arguments: Vec<Expr>,
}

impl Expr {
    pub fn binary(operator: impl Into<String>, left: Expr, right: Expr) -> Self {
        Self::Binary(Binary {
            operator: operator.into(),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn access(receiver: Option<Expr>, name: impl Into<String>) -> Self {
        Self::Access(Access {
            receiver: receiver.map(Box::new),
            name: name.into(),
        })
    }

    pub fn function(receiver: Option<Expr>, name: impl Into<String>, arguments: Vec<Expr>) -> Self {
        Self::Function(Function {
            receiver: receiver.map(Box::new),
            name: name.into(),
            arguments,
        })
    }
}

impl From<Literal> for Expr {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}
