use std::{
    io,
    sync::{Arc, Mutex},
};

use crate::{
    kind::Kind,
    runtime::Runtime,
    target::{Raised, Target},
    value::Value,
};

/// A shared writer, clones see the same bytes.
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
        let guard = self.0.lock().unwrap();
        String::from_utf8_lossy(&guard).into_owned()
    }
}

/// A runtime with every toggle off that writes into the returned buffer.
pub fn runtime() -> (Runtime, Buffer) {
    let buffer = Buffer::default();
    let runtime = Runtime::default()
        .with_output(buffer.clone())
        .with_exit_handler(|code| panic!("unexpected exit with status {code}"));
    (runtime, buffer)
}

/// `increment(n) = n + 1`
pub fn increment() -> Target {
    Target::new("increment", |args| -> Result<Value, Raised> {
        Ok(Value::from(args.get(0)?.as_int()? + 1))
    })
}

/// Adjacent pairs of a list, fewer than two items raise a `ValueError`.
pub fn pairwise() -> Target {
    Target::new("pairwise", |args| -> Result<Value, Raised> {
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
