use super::Position;

#[derive(Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    position: Option<Position>,
    message: &'static str,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $pos:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_position($pos)
    };
    ($err:ident, $pos:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_position($pos)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code,
            position: None,
            message: "",
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Statement errors are raised without a position; the runtime
    /// stamps the cursor on them once, on the way out.
    pub fn in_position(&self, position: Position) -> Error {
        if self.position.is_some() {
            return self.clone();
        }
        Error {
            code: self.code,
            position: Some(position),
            message: self.message,
        }
    }

    pub fn message(&self, message: &'static str) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        Error {
            code: self.code,
            position: self.position,
            message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    FileNotFound = 1,
    FileCantOpen,
    LoadNoNumber,
    LoadDuplicate,
    InvalidLine,
    InvalidDelimiter,
    StringLength,
    MemOut,
    TypeMismatch,
    StringMismatch,
    ParMismatch,
    FewArguments,
    ManyArguments,
    MissingOperand,
    MissingOperator,
    MissingEqual,
    UnknownVar,
    UnknownOp,
    UnknownFunc,
    ReservedName,
    NoThen,
    QueueEmpty,
    QueueFull,
    StackFull,
    DivZero,
    IncompleteFor,
    GosubOverflow,
    ReturnNoGosub,
    ArrayRedefine,
    ArrayOutOfRange,
    ArrayDimension,
    VarRedefine,
    VarOutOfRange,
    DefFnRedefine,
    DefFnArguments,
    SyscallError,
    RunError,
    TooManyTokens,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use ErrorCode::*;
        let s = match self {
            FileNotFound => "File not found",
            FileCantOpen => "Can't open file",
            LoadNoNumber => "No line number",
            LoadDuplicate => "Duplicate line number",
            InvalidLine => "Invalid line number",
            InvalidDelimiter => "Invalid delimiter",
            StringLength => "String too long",
            MemOut => "Out of memory",
            TypeMismatch => "Type mismatch",
            StringMismatch => "String mismatch",
            ParMismatch => "Missing parenthese",
            FewArguments => "Too few arguments",
            ManyArguments => "Too many arguments",
            MissingOperand => "Missing operand",
            MissingOperator => "Missing operator",
            MissingEqual => "Missing \"=\"",
            UnknownVar => "Unknown variable",
            UnknownOp => "Unknown operator",
            UnknownFunc => "Unknown function",
            ReservedName => "Reserved name",
            NoThen => "Missing \"then\"",
            QueueEmpty => "Queue is empty",
            QueueFull => "Queue is full",
            StackFull => "Stack is full",
            DivZero => "Divide by zero",
            IncompleteFor => "Incomplete FOR loop",
            GosubOverflow => "GOSUB stack overflow",
            ReturnNoGosub => "RETURN without GOSUB",
            ArrayRedefine => "Array redefinition",
            ArrayOutOfRange => "Array out of range",
            ArrayDimension => "Wrong array dimension",
            VarRedefine => "Variable redefinition",
            VarOutOfRange => "Variable out of range",
            DefFnRedefine => "Function redefinition",
            DefFnArguments => "Too many function arguments",
            SyscallError => "System call error",
            RunError => "Program is running",
            TooManyTokens => "Too many tokens",
        };
        write!(f, "{}", s)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.code)?;
        if !self.message.is_empty() {
            write!(f, "; {}", self.message)?;
        }
        if let Some(position) = self.position {
            write!(f, " in {}", position)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(error!(DivZero).to_string(), "Divide by zero");
        assert_eq!(
            error!(InvalidLine, Position::new(20, 1)).to_string(),
            "Invalid line number in 20:1"
        );
        assert_eq!(
            error!(StackFull, Position::new(5, 0); "TOKEN LIST").to_string(),
            "Stack is full; TOKEN LIST in 5:0"
        );
    }

    #[test]
    fn test_position_sticks() {
        let e = error!(TypeMismatch, Position::new(10, 2));
        assert_eq!(e.in_position(Position::new(99, 0)).position(), Some(Position::new(10, 2)));
    }
}
