use super::runtime::Status;
use super::statement::has_args;
use super::Runtime;
use crate::error;
use crate::lang::token::Delim;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// Most values any drawing statement takes.
const MAX_COORDS: usize = 6;

/// ## Drawing statements
///
/// Parameters are non-negative numbers. A trailing xor flag is set
/// by any nonzero value. Every shape moves the last point.

impl Runtime {
    fn coords(&mut self, lead: Delim) -> Result<Vec<u32>> {
        if !has_args(lead) {
            return Err(error!(FewArguments));
        }
        self.eval(lead)?;
        let vals = self.ctx.drain();
        if vals.is_empty() {
            return Err(error!(FewArguments));
        }
        if vals.len() > MAX_COORDS {
            return Err(error!(ManyArguments));
        }
        vals.iter().map(Runtime::colour).collect()
    }

    pub(super) fn plot(&mut self, lead: Delim) -> Result<Status> {
        let c = self.coords(lead)?;
        match c.len() {
            0..=1 => return Err(error!(FewArguments)),
            2..=3 => {}
            _ => return Err(error!(ManyArguments)),
        }
        let xor = flag(&c, 2);
        self.host.plot(c[0], c[1], xor);
        self.last_point = (c[0], c[1]);
        Ok(Status::Ok)
    }

    /// Two values draw from the last point.
    pub(super) fn draw(&mut self, lead: Delim) -> Result<Status> {
        let c = self.coords(lead)?;
        let (from, to, xor) = match c.len() {
            0..=1 => return Err(error!(FewArguments)),
            2..=3 => (self.last_point, (c[0], c[1]), flag(&c, 2)),
            4..=5 => ((c[0], c[1]), (c[2], c[3]), flag(&c, 4)),
            _ => return Err(error!(ManyArguments)),
        };
        self.host.draw(from, to, xor);
        self.last_point = to;
        Ok(Status::Ok)
    }

    pub(super) fn rect(&mut self, lead: Delim) -> Result<Status> {
        let c = self.coords(lead)?;
        if c.len() < 4 {
            return Err(error!(FewArguments));
        }
        self.host
            .rect(c[0], c[1], c[2], c[3], flag(&c, 4), flag(&c, 5));
        self.last_point = (c[0], c[1]);
        Ok(Status::Ok)
    }

    pub(super) fn circle(&mut self, lead: Delim) -> Result<Status> {
        let c = self.coords(lead)?;
        match c.len() {
            0..=2 => return Err(error!(FewArguments)),
            3..=5 => {}
            _ => return Err(error!(ManyArguments)),
        }
        self.host.circle(c[0], c[1], c[2], flag(&c, 3), flag(&c, 4));
        self.last_point = (c[0], c[1]);
        Ok(Status::Ok)
    }
}

fn flag(c: &[u32], index: usize) -> bool {
    c.get(index).map_or(false, |n| *n != 0)
}
