//! The built-in operator set. Every operator is an entry of
//! `Operator::ALL`; `system_dict` installs them at construction and
//! `exec_operator` dispatches on the tag.

use crate::error::EvalError;
use crate::interp::Interp;
use minips_object::object::{new_dict, nums_equal, DictRef, Object, NUM_EPS};
use minips_object::ops::Operator;
use minips_object::pretty;
use std::io::Write;

/// Build the system dictionary installed at the bottom of the dictionary
/// stack.
pub(crate) fn system_dict() -> DictRef {
    let dict = new_dict();
    {
        let mut map = dict.borrow_mut();
        for &op in Operator::ALL {
            map.insert(op.name().to_string(), Object::Builtin(op));
        }
    }
    dict
}

/// Narrow a numeric result to Integer when it is integral within tolerance
/// and representable, otherwise keep it Real.
fn number(x: f64) -> Object {
    let rounded = x.round();
    if (x - rounded).abs() <= NUM_EPS && rounded >= i32::MIN as f64 && rounded <= i32::MAX as f64 {
        Object::Integer(rounded as i32)
    } else {
        Object::Real(x)
    }
}

impl Interp {
    pub(crate) fn exec_operator(&mut self, op: Operator) -> Result<(), EvalError> {
        match op {
            Operator::Pop => self.pop("pop").map(|_| ()),
            Operator::Exch => self.op_exch(),
            Operator::Dup => self.op_dup(),
            Operator::Clear => {
                self.op_stack.clear();
                Ok(())
            }
            Operator::Count => {
                let n = self.op_stack.len() as i32;
                self.push(Object::Integer(n));
                Ok(())
            }
            Operator::Copy => self.op_copy(),

            Operator::Add => self.op_arith("add", |a, b| a + b),
            Operator::Sub => self.op_arith("sub", |a, b| a - b),
            Operator::Mul => self.op_arith("mul", |a, b| a * b),
            Operator::Div => self.op_arith("div", |a, b| a / b),
            Operator::Mod => self.op_mod(),

            Operator::Eq => self.op_eq(),
            Operator::Ne => self.op_ne(),
            Operator::Gt => self.op_cmp("gt", |a, b| a > b),
            Operator::Lt => self.op_cmp("lt", |a, b| a < b),
            Operator::Ge => self.op_cmp("ge", |a, b| a >= b),
            Operator::Le => self.op_cmp("le", |a, b| a <= b),

            Operator::And => self.op_bool("and", |a, b| a && b),
            Operator::Or => self.op_bool("or", |a, b| a || b),
            Operator::Not => self.op_not(),

            Operator::Dict => self.op_dict(),
            Operator::Begin => self.op_begin(),
            Operator::End => self.op_end(),
            Operator::Def => self.op_def(),

            Operator::If => self.op_if(),
            Operator::IfElse => self.op_ifelse(),
            Operator::Repeat => self.op_repeat(),
            Operator::For => self.op_for(),

            Operator::Quit => {
                self.quit = true;
                Ok(())
            }
            Operator::Print => self.op_print(),
            Operator::Equals => self.op_equals(),
            Operator::EqEq => self.op_eqeq(),
            Operator::Exec => self.op_exec(),
        }
    }

    fn op_exch(&mut self) -> Result<(), EvalError> {
        let b = self.pop("exch")?;
        let a = self.pop("exch")?;
        self.push(b);
        self.push(a);
        Ok(())
    }

    fn op_dup(&mut self) -> Result<(), EvalError> {
        let top = self.op_stack.last().cloned().ok_or(EvalError::StackUnderflow("dup"))?;
        self.push(top);
        Ok(())
    }

    // duplicate the top n items, preserving order
    fn op_copy(&mut self) -> Result<(), EvalError> {
        let n = self.pop_int("copy")?;
        let depth = self.op_stack.len();
        if n < 0 || n as usize > depth {
            return Err(EvalError::RangeCheck("copy"));
        }
        self.op_stack.extend_from_within(depth - n as usize..);
        Ok(())
    }

    // second-pushed operand is the right-hand side
    fn op_arith(&mut self, op: &'static str, f: fn(f64, f64) -> f64) -> Result<(), EvalError> {
        let b = self.pop_number(op)?;
        let a = self.pop_number(op)?;
        self.push(number(f(a, b)));
        Ok(())
    }

    fn op_mod(&mut self) -> Result<(), EvalError> {
        let b = self.pop_int("mod")?;
        let a = self.pop_int("mod")?;
        match a.checked_rem(b) {
            Some(r) => {
                self.push(Object::Integer(r));
                Ok(())
            }
            None => Err(EvalError::RangeCheck("mod")),
        }
    }

    fn op_eq(&mut self) -> Result<(), EvalError> {
        let b = self.pop("eq")?;
        let a = self.pop("eq")?;
        self.push(Object::Boolean(a == b));
        Ok(())
    }

    fn op_ne(&mut self) -> Result<(), EvalError> {
        let b = self.pop("ne")?;
        let a = self.pop("ne")?;
        self.push(Object::Boolean(a != b));
        Ok(())
    }

    fn op_cmp(&mut self, op: &'static str, f: fn(f64, f64) -> bool) -> Result<(), EvalError> {
        let b = self.pop_number(op)?;
        let a = self.pop_number(op)?;
        self.push(Object::Boolean(f(a, b)));
        Ok(())
    }

    fn op_bool(&mut self, op: &'static str, f: fn(bool, bool) -> bool) -> Result<(), EvalError> {
        let b = self.pop_bool(op)?;
        let a = self.pop_bool(op)?;
        self.push(Object::Boolean(f(a, b)));
        Ok(())
    }

    fn op_not(&mut self) -> Result<(), EvalError> {
        let v = self.pop_bool("not")?;
        self.push(Object::Boolean(!v));
        Ok(())
    }

    fn op_dict(&mut self) -> Result<(), EvalError> {
        // the size hint is popped and ignored
        self.pop_int("dict")?;
        self.push(Object::Dictionary(new_dict()));
        Ok(())
    }

    fn op_begin(&mut self) -> Result<(), EvalError> {
        match self.pop("begin")? {
            Object::Dictionary(d) => {
                self.dict_stack.push(d);
                Ok(())
            }
            _ => Err(EvalError::TypeCheck("begin")),
        }
    }

    fn op_end(&mut self) -> Result<(), EvalError> {
        if self.dict_stack.len() <= 1 {
            return Err(EvalError::DictStackUnderflow);
        }
        self.dict_stack.pop();
        Ok(())
    }

    fn op_def(&mut self) -> Result<(), EvalError> {
        let value = self.pop("def")?;
        let key = self.pop("def")?;
        match key {
            Object::LiteralName(name) => {
                if let Some(top) = self.dict_stack.last() {
                    top.borrow_mut().insert(name, value);
                }
                Ok(())
            }
            _ => Err(EvalError::TypeCheck("def")),
        }
    }

    fn op_if(&mut self) -> Result<(), EvalError> {
        let (code, env) = self.pop_proc("if")?;
        let cond = self.pop_bool("if")?;
        if cond {
            self.run_proc(&code, &env)
        } else {
            Ok(())
        }
    }

    fn op_ifelse(&mut self) -> Result<(), EvalError> {
        let (f_code, f_env) = self.pop_proc("ifelse")?;
        let (t_code, t_env) = self.pop_proc("ifelse")?;
        if self.pop_bool("ifelse")? {
            self.run_proc(&t_code, &t_env)
        } else {
            self.run_proc(&f_code, &f_env)
        }
    }

    fn op_repeat(&mut self) -> Result<(), EvalError> {
        let (code, env) = self.pop_proc("repeat")?;
        let n = self.pop_int("repeat")?;
        if n < 0 {
            return Err(EvalError::RangeCheck("repeat"));
        }
        for _ in 0..n {
            if self.quit {
                break;
            }
            self.run_proc(&code, &env)?;
        }
        Ok(())
    }

    fn op_for(&mut self) -> Result<(), EvalError> {
        let (code, env) = self.pop_proc("for")?;
        let limit = self.pop_int("for")?;
        let step = self.pop_int("for")?;
        let mut index = self.pop_int("for")?;
        if step == 0 {
            return Err(EvalError::InvalidIncrement);
        }
        while if step > 0 { index <= limit } else { index >= limit } {
            if self.quit {
                break;
            }
            self.push(Object::Integer(index));
            self.run_proc(&code, &env)?;
            // a leftover copy of the index on top of the stack is consumed
            // so bodies that ignore the index stay balanced
            if let Some(x) = self.op_stack.last().and_then(Object::as_number) {
                if nums_equal(x, index as f64) {
                    self.op_stack.pop();
                }
            }
            index = match index.checked_add(step) {
                Some(next) => next,
                None => break,
            };
        }
        Ok(())
    }

    fn op_print(&mut self) -> Result<(), EvalError> {
        match self.pop("print")? {
            Object::String(s) => {
                write!(self.out, "{s}")?;
                Ok(())
            }
            _ => Err(EvalError::TypeCheck("print")),
        }
    }

    fn op_equals(&mut self) -> Result<(), EvalError> {
        let obj = self.pop("=")?;
        writeln!(self.out, "{obj}")?;
        Ok(())
    }

    fn op_eqeq(&mut self) -> Result<(), EvalError> {
        let obj = self.pop("==")?;
        writeln!(self.out, "{}", pretty::print(&obj))?;
        Ok(())
    }

    fn op_exec(&mut self) -> Result<(), EvalError> {
        match self.pop("exec")? {
            Object::Procedure { code, env } => self.run_proc(&code, &env),
            Object::Builtin(op) => self.exec_operator(op),
            _ => Err(EvalError::CannotExecute("exec")),
        }
    }
}
