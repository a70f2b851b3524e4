pub mod ops {
    /// Entry in the built-in operator table. The runtime installs one
    /// `Object::Builtin` per entry into the system dictionary and dispatches
    /// on the tag when the operator executes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Operator {
        Pop,
        Exch,
        Dup,
        Clear,
        Count,
        Copy,
        Add,
        Sub,
        Mul,
        Div,
        Mod,
        Eq,
        Ne,
        Gt,
        Lt,
        Ge,
        Le,
        And,
        Or,
        Not,
        Dict,
        Begin,
        End,
        Def,
        If,
        IfElse,
        Repeat,
        For,
        Quit,
        Print,
        Equals,
        EqEq,
        Exec,
    }

    impl Operator {
        pub const ALL: &'static [Operator] = &[
            Operator::Pop,
            Operator::Exch,
            Operator::Dup,
            Operator::Clear,
            Operator::Count,
            Operator::Copy,
            Operator::Add,
            Operator::Sub,
            Operator::Mul,
            Operator::Div,
            Operator::Mod,
            Operator::Eq,
            Operator::Ne,
            Operator::Gt,
            Operator::Lt,
            Operator::Ge,
            Operator::Le,
            Operator::And,
            Operator::Or,
            Operator::Not,
            Operator::Dict,
            Operator::Begin,
            Operator::End,
            Operator::Def,
            Operator::If,
            Operator::IfElse,
            Operator::Repeat,
            Operator::For,
            Operator::Quit,
            Operator::Print,
            Operator::Equals,
            Operator::EqEq,
            Operator::Exec,
        ];

        /// The name the operator is installed under in the system dictionary.
        pub fn name(self) -> &'static str {
            match self {
                Operator::Pop => "pop",
                Operator::Exch => "exch",
                Operator::Dup => "dup",
                Operator::Clear => "clear",
                Operator::Count => "count",
                Operator::Copy => "copy",
                Operator::Add => "add",
                Operator::Sub => "sub",
                Operator::Mul => "mul",
                Operator::Div => "div",
                Operator::Mod => "mod",
                Operator::Eq => "eq",
                Operator::Ne => "ne",
                Operator::Gt => "gt",
                Operator::Lt => "lt",
                Operator::Ge => "ge",
                Operator::Le => "le",
                Operator::And => "and",
                Operator::Or => "or",
                Operator::Not => "not",
                Operator::Dict => "dict",
                Operator::Begin => "begin",
                Operator::End => "end",
                Operator::Def => "def",
                Operator::If => "if",
                Operator::IfElse => "ifelse",
                Operator::Repeat => "repeat",
                Operator::For => "for",
                Operator::Quit => "quit",
                Operator::Print => "print",
                Operator::Equals => "=",
                Operator::EqEq => "==",
                Operator::Exec => "exec",
            }
        }
    }
}

pub mod env {
    use crate::object::Object;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    /// One link of a captured lexical environment: a shallow snapshot of a
    /// dictionary-stack level plus the next (outer) frame. Chains are built
    /// bottom-to-top from the dictionary stack, so the deepest frame is the
    /// system dictionary snapshot. Frames only point outward; no cycles.
    #[derive(Debug)]
    pub struct Frame {
        pub dict: BTreeMap<String, Object>,
        pub next: Option<Rc<Frame>>,
    }

    /// A captured chain, or `None` outside any capture (dynamic mode, or
    /// top-level code in lexical mode).
    pub type EnvChain = Option<Rc<Frame>>;

    impl Frame {
        /// Innermost-first search of the chain starting at this frame.
        pub fn lookup(&self, name: &str) -> Option<&Object> {
            let mut frame = self;
            loop {
                if let Some(v) = frame.dict.get(name) {
                    return Some(v);
                }
                match &frame.next {
                    Some(next) => frame = next,
                    None => return None,
                }
            }
        }
    }
}

pub mod object {
    use crate::env::Frame;
    use crate::ops::Operator;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::fmt;
    use std::rc::Rc;

    /// Numeric comparisons and the integer-narrowing rule share one tolerance.
    pub const NUM_EPS: f64 = 1e-12;

    /// Dictionaries are shared by reference so that `begin`/`def` mutate the
    /// same object a program pushed.
    pub type DictRef = Rc<RefCell<BTreeMap<String, Object>>>;

    pub fn new_dict() -> DictRef {
        Rc::new(RefCell::new(BTreeMap::new()))
    }

    #[derive(Debug, Clone)]
    pub enum Object {
        Integer(i32),
        Real(f64),
        Boolean(bool),
        /// Raw inner text of the literal; the outer parentheses are not stored
        /// and backslash escapes are kept verbatim.
        String(String),
        /// Pushed as data; the leading `/` is not stored.
        LiteralName(String),
        /// Executable name; resolved and executed on evaluation.
        Name(String),
        Array(Vec<Object>),
        /// Code list plus the environment chain captured at literal
        /// evaluation time (lexical mode only; `None` until then).
        Procedure {
            code: Rc<Vec<Object>>,
            env: Option<Rc<Frame>>,
        },
        Dictionary(DictRef),
        Mark,
        Null,
        Builtin(Operator),
    }

    pub fn nums_equal(a: f64, b: f64) -> bool {
        (a - b).abs() <= NUM_EPS
    }

    impl Object {
        pub fn as_number(&self) -> Option<f64> {
            match self {
                Object::Integer(n) => Some(*n as f64),
                Object::Real(r) => Some(*r),
                _ => None,
            }
        }
    }

    // Structural equality within a kind; Int and Real cross-compare within
    // tolerance; procedures and dictionaries compare by identity.
    impl PartialEq for Object {
        fn eq(&self, other: &Self) -> bool {
            match (self, other) {
                (Object::Integer(a), Object::Integer(b)) => a == b,
                (Object::Boolean(a), Object::Boolean(b)) => a == b,
                (Object::String(a), Object::String(b)) => a == b,
                (Object::LiteralName(a), Object::LiteralName(b)) => a == b,
                (Object::Name(a), Object::Name(b)) => a == b,
                (Object::Array(a), Object::Array(b)) => a == b,
                (Object::Procedure { code: a, .. }, Object::Procedure { code: b, .. }) => {
                    Rc::ptr_eq(a, b)
                }
                (Object::Dictionary(a), Object::Dictionary(b)) => Rc::ptr_eq(a, b),
                (Object::Mark, Object::Mark) => true,
                (Object::Null, Object::Null) => true,
                (Object::Builtin(a), Object::Builtin(b)) => a == b,
                (a, b) => match (a.as_number(), b.as_number()) {
                    (Some(x), Some(y)) => nums_equal(x, y),
                    _ => false,
                },
            }
        }
    }

    // The one-line form written by `=`.
    impl fmt::Display for Object {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Object::Integer(n) => write!(f, "{n}"),
                Object::Real(r) => write!(f, "{r}"),
                Object::Boolean(b) => write!(f, "{}", if *b { "true" } else { "false" }),
                Object::String(s) => write!(f, "({s})"),
                Object::LiteralName(n) => write!(f, "/{n}"),
                Object::Name(n) => write!(f, "{n}"),
                Object::Array(items) => {
                    write!(f, "[")?;
                    for (i, obj) in items.iter().enumerate() {
                        if i != 0 {
                            write!(f, " ")?;
                        }
                        write!(f, "{obj}")?;
                    }
                    write!(f, "]")
                }
                Object::Procedure { code, .. } => {
                    write!(f, "{{")?;
                    for obj in code.iter() {
                        write!(f, " {obj}")?;
                    }
                    write!(f, " }}")
                }
                Object::Dictionary(d) => write!(f, "<<dict {}>>", d.borrow().len()),
                Object::Mark => write!(f, "-mark-"),
                Object::Null => write!(f, "null"),
                Object::Builtin(op) => write!(f, "--{}--", op.name()),
            }
        }
    }
}

pub mod pretty {
    use crate::object::Object;

    /// The recursive form written by `==`: identical to `=` for atoms, but
    /// dictionaries render their entries as `<< /k v ... >>`.
    pub fn print(obj: &Object) -> String {
        match obj {
            Object::Array(items) => {
                let inner = items.iter().map(print).collect::<Vec<_>>().join(" ");
                format!("[{inner}]")
            }
            Object::Procedure { code, .. } => {
                let mut out = String::from("{");
                for obj in code.iter() {
                    out.push(' ');
                    out.push_str(&print(obj));
                }
                out.push_str(" }");
                out
            }
            Object::Dictionary(d) => {
                let mut out = String::from("<<");
                for (k, v) in d.borrow().iter() {
                    out.push_str(&format!(" /{k} {}", print(v)));
                }
                out.push_str(" >>");
                out
            }
            atom => atom.to_string(),
        }
    }
}
