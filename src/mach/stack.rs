use crate::lang::{Error, ErrorCode};

type Result<T> = std::result::Result<T, Error>;

/// ## Stack enforced and size limited vector

pub struct Stack<T> {
    capacity: usize,
    overflow: ErrorCode,
    underflow: ErrorCode,
    vec: Vec<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.vec)
    }
}

impl<T> Stack<T> {
    pub fn new(capacity: usize, overflow: ErrorCode, underflow: ErrorCode) -> Stack<T> {
        Stack {
            capacity,
            overflow,
            underflow,
            vec: Vec::with_capacity(capacity),
        }
    }
    pub fn clear(&mut self) {
        self.vec.clear()
    }
    pub fn len(&self) -> usize {
        self.vec.len()
    }
    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }
    pub fn is_full(&self) -> bool {
        self.vec.len() >= self.capacity
    }
    pub fn last(&self) -> Option<&T> {
        self.vec.last()
    }
    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.vec.last_mut()
    }
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.vec.get(idx)
    }
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.vec.iter()
    }
    pub fn push(&mut self, val: T) -> Result<()> {
        if self.is_full() {
            return Err(Error::new(self.overflow));
        }
        self.vec.push(val);
        Ok(())
    }
    pub fn pop(&mut self) -> Result<T> {
        match self.vec.pop() {
            Some(v) => Ok(v),
            None => Err(Error::new(self.underflow)),
        }
    }
    /// Removes and returns everything from `at` to the top, bottom first.
    pub fn split_off(&mut self, at: usize) -> Vec<T> {
        if at >= self.vec.len() {
            Vec::new()
        } else {
            self.vec.split_off(at)
        }
    }
}
