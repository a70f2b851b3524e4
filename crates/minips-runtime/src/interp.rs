//! The interpreter core: operand and dictionary stacks, the evaluator loop,
//! and the two name-resolution strategies.

use crate::error::EvalError;
use minips_object::env::{EnvChain, Frame};
use minips_object::object::{DictRef, Object};
use std::io::{self, Write};
use std::rc::Rc;

/// Name-resolution discipline, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scoping {
    /// Names resolve against the live dictionary stack, top to bottom.
    Dynamic,
    /// Names resolve against the chain captured when the procedure literal
    /// was evaluated, falling back to the system dictionary only.
    Lexical,
}

pub struct Interp {
    pub(crate) scoping: Scoping,
    pub(crate) op_stack: Vec<Object>,
    // bottom element is the system dictionary and is never removed
    pub(crate) dict_stack: Vec<DictRef>,
    pub(crate) quit: bool,
    pub(crate) out: Box<dyn Write>,
}

impl Interp {
    pub fn new(scoping: Scoping, out: Box<dyn Write>) -> Self {
        Interp {
            scoping,
            op_stack: Vec::new(),
            dict_stack: vec![crate::builtins::system_dict()],
            quit: false,
            out,
        }
    }

    pub fn stdout(scoping: Scoping) -> Self {
        Self::new(scoping, Box::new(io::stdout()))
    }

    /// Tokenize, parse and execute a program. Operand and dictionary stacks
    /// persist across calls on the same instance.
    pub fn run(&mut self, src: &str) -> Result<(), EvalError> {
        self.quit = false;
        let code = minips_parser::parse(src);
        self.eval(&code, &None)
    }

    /// Current operand stack depth.
    pub fn depth(&self) -> usize {
        self.op_stack.len()
    }

    /// Current dictionary stack depth (1 = system dictionary only).
    pub fn dict_depth(&self) -> usize {
        self.dict_stack.len()
    }

    pub fn top(&self) -> Option<&Object> {
        self.op_stack.last()
    }

    /// Execute a code list under the given static environment (`None` in
    /// dynamic mode or at top level in lexical mode).
    pub(crate) fn eval(&mut self, code: &[Object], env: &EnvChain) -> Result<(), EvalError> {
        for obj in code {
            if self.quit {
                break;
            }
            match obj {
                // a procedure literal captures once, at evaluation time
                Object::Procedure { code, env: None } if self.scoping == Scoping::Lexical => {
                    let captured = self.capture();
                    self.op_stack.push(Object::Procedure { code: code.clone(), env: captured });
                }
                Object::Builtin(op) => self.exec_operator(*op)?,
                Object::Name(name) => {
                    let resolved = self.resolve(name, env)?;
                    self.execute(resolved)?;
                }
                other => self.op_stack.push(other.clone()),
            }
        }
        Ok(())
    }

    /// Snapshot the dictionary stack bottom-to-top into a frame chain. The
    /// innermost frame is the current top dictionary; entries are copied
    /// shallowly, values stay shared.
    fn capture(&self) -> EnvChain {
        let mut chain: EnvChain = None;
        for dict in &self.dict_stack {
            chain = Some(Rc::new(Frame { dict: dict.borrow().clone(), next: chain }));
        }
        chain
    }

    fn resolve(&self, name: &str, env: &EnvChain) -> Result<Object, EvalError> {
        match self.scoping {
            Scoping::Dynamic => {
                for dict in self.dict_stack.iter().rev() {
                    if let Some(v) = dict.borrow().get(name) {
                        return Ok(v.clone());
                    }
                }
                Err(EvalError::Undefined(name.to_string()))
            }
            Scoping::Lexical => {
                if let Some(frame) = env {
                    if let Some(v) = frame.lookup(name) {
                        return Ok(v.clone());
                    }
                }
                // on a chain miss only the system dictionary is consulted
                if let Some(system) = self.dict_stack.first() {
                    if let Some(v) = system.borrow().get(name) {
                        return Ok(v.clone());
                    }
                }
                Err(EvalError::Undefined(name.to_string()))
            }
        }
    }

    /// Execute the result of a name lookup: operators run, procedures have
    /// their body evaluated, anything else is pushed.
    fn execute(&mut self, value: Object) -> Result<(), EvalError> {
        match value {
            Object::Builtin(op) => self.exec_operator(op),
            Object::Procedure { code, env } => self.run_proc(&code, &env),
            other => {
                self.op_stack.push(other);
                Ok(())
            }
        }
    }

    /// Run a procedure body under the environment its scoping mode calls
    /// for: the captured chain in lexical mode (possibly `None` for a
    /// pre-capture procedure), no chain in dynamic mode.
    pub(crate) fn run_proc(
        &mut self,
        code: &Rc<Vec<Object>>,
        env: &EnvChain,
    ) -> Result<(), EvalError> {
        match self.scoping {
            Scoping::Lexical => self.eval(code, env),
            Scoping::Dynamic => self.eval(code, &None),
        }
    }

    pub(crate) fn push(&mut self, obj: Object) {
        self.op_stack.push(obj);
    }

    pub(crate) fn pop(&mut self, op: &'static str) -> Result<Object, EvalError> {
        self.op_stack.pop().ok_or(EvalError::StackUnderflow(op))
    }

    pub(crate) fn pop_int(&mut self, op: &'static str) -> Result<i32, EvalError> {
        match self.pop(op)? {
            Object::Integer(n) => Ok(n),
            _ => Err(EvalError::TypeCheck(op)),
        }
    }

    pub(crate) fn pop_number(&mut self, op: &'static str) -> Result<f64, EvalError> {
        self.pop(op)?.as_number().ok_or(EvalError::TypeCheck(op))
    }

    pub(crate) fn pop_bool(&mut self, op: &'static str) -> Result<bool, EvalError> {
        match self.pop(op)? {
            Object::Boolean(b) => Ok(b),
            _ => Err(EvalError::TypeCheck(op)),
        }
    }

    pub(crate) fn pop_proc(
        &mut self,
        op: &'static str,
    ) -> Result<(Rc<Vec<Object>>, EnvChain), EvalError> {
        match self.pop(op)? {
            Object::Procedure { code, env } => Ok((code, env)),
            _ => Err(EvalError::TypeCheck(op)),
        }
    }
}
