use std::{
    cell::RefCell,
    io,
    rc::Rc,
    sync::{Arc, Mutex},
};

use quickdemo::{
    kind::Kind,
    runtime::{Runtime, Settings},
    target::{CallResult, Raised, Target},
    value::Value,
};

mod sanitize;
pub use sanitize::*;

#[derive(Debug, Default, Clone)]
pub struct Buffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::other("poison error"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Buffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

/// Exit statuses the runtime asked for.
pub type Exits = Rc<RefCell<Vec<i32>>>;

/// A runtime writing into a buffer whose exit handler only records the status.
pub fn runtime(settings: Settings) -> (Runtime, Buffer, Exits) {
    let buffer = Buffer::default();
    let exits = Exits::default();
    let recorded = Rc::clone(&exits);
    let runtime = Runtime::with_settings(settings)
        .with_output(buffer.clone())
        .with_exit_handler(move |code| recorded.borrow_mut().push(code));
    (runtime, buffer, exits)
}

pub fn f() -> Target {
    Target::new("f", |args| -> CallResult {
        Ok(Value::from(args.get(0)?.as_int()? + 1))
    })
}

pub fn pairwise() -> Target {
    Target::new("pairwise", |args| -> CallResult {
        let items = args.get(0)?.as_seq()?;
        if items.len() < 2 {
            return Err(Raised::new(Kind::value_error(), "not enough elements to form pairs"));
        }
        Ok(Value::List(
            items
                .windows(2)
                .map(|pair| Value::tuple(pair.iter().cloned()))
                .collect(),
        ))
    })
}

pub fn add_to_list() -> Target {
    Target::new("add_to_list", |args| -> CallResult {
        let number = args.named("number", 1)?.as_int()?;
        let items = args.named("input_list", 0)?.as_seq()?;
        items
            .iter()
            .map(|item| -> Result<Value, Raised> { Ok(Value::from(item.as_int()? + number)) })
            .collect::<Result<Vec<_>, Raised>>()
            .map(Value::List)
    })
}

/// A target that records its name on every call.
pub fn recording(name: &'static str, calls: &Rc<RefCell<Vec<&'static str>>>) -> Target {
    let calls = Rc::clone(calls);
    Target::new(name, move |_| calls.borrow_mut().push(name))
}
