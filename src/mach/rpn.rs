use super::{Stack, Val, QUEUE_LEN, STACK_LEN, TOKEN_LIST_DEPTH};
use crate::error;
use crate::lang::token::{Bracket, Delim, Operator, Token, Word};
use crate::lang::{Error, ErrorCode};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Shunting-yard state
///
/// Values wait on the queue, operators and brackets on the stack.
/// User function bodies are evaluated from their own token list
/// while the caller's list waits in `TokenLists`.

/// Entries on the operator stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pending {
    Open(Bracket),
    /// Boundary of a user function body.
    Frame,
    Op(Operator),
    /// A function and the queue length when it was seen. Its
    /// arguments are whatever lies above that mark.
    Call(Word, usize),
}

impl Pending {
    pub fn precedence(&self) -> i8 {
        match self {
            Pending::Open(_) | Pending::Frame => -1,
            Pending::Call(..) => 6,
            Pending::Op(op) => op.precedence(),
        }
    }
}

#[derive(Debug, Clone)]
struct TokenList {
    tokens: Rc<[Token]>,
    ptr: usize,
    depth: usize,
}

impl TokenList {
    fn new(tokens: Rc<[Token]>) -> TokenList {
        TokenList {
            tokens,
            ptr: 0,
            depth: 0,
        }
    }
}

/// The token list being read plus the callers waiting on it.
#[derive(Debug)]
pub struct TokenLists {
    current: TokenList,
    saved: Stack<TokenList>,
}

impl Default for TokenLists {
    fn default() -> TokenLists {
        TokenLists {
            current: TokenList::new(Rc::from(Vec::new())),
            saved: Stack::new(
                TOKEN_LIST_DEPTH,
                ErrorCode::StackFull,
                ErrorCode::StackFull,
            ),
        }
    }
}

impl TokenLists {
    /// Starts over on a freshly tokenized line.
    pub fn reset(&mut self, tokens: Vec<Token>) {
        self.saved.clear();
        self.current = TokenList::new(tokens.into());
    }

    pub fn token(&self) -> Option<&Token> {
        self.current.tokens.get(self.current.ptr)
    }

    /// Past the last token reads as end of line.
    pub fn delim(&self) -> Delim {
        self.token().map_or(Delim::End, |t| t.delim)
    }

    pub fn word(&self) -> Option<Word> {
        self.token().and_then(Token::word)
    }

    pub fn advance(&mut self) {
        self.current.ptr += 1;
    }

    pub fn ptr(&self) -> usize {
        self.current.ptr
    }

    pub fn set_ptr(&mut self, ptr: usize) {
        self.current.ptr = ptr;
    }

    pub fn tokens(&self) -> Rc<[Token]> {
        self.current.tokens.clone()
    }

    /// Steps past the next `:`. False when the line runs out first.
    pub fn skip_statement(&mut self) -> bool {
        while let Some(token) = self.token() {
            let colon = token.delim == Delim::Colon;
            self.advance();
            if colon {
                return true;
            }
        }
        false
    }

    /// Number of callers waiting.
    pub fn level(&self) -> usize {
        self.saved.len()
    }

    pub fn depth(&self) -> usize {
        self.current.depth
    }

    pub fn open(&mut self) {
        self.current.depth += 1;
    }

    pub fn close(&mut self) -> Result<()> {
        if self.current.depth == 0 {
            return Err(error!(ParMismatch));
        }
        self.current.depth -= 1;
        Ok(())
    }

    pub fn enter(&mut self, body: Rc<[Token]>) -> Result<()> {
        self.saved
            .push(self.current.clone())
            .map_err(|_| error!(StackFull; "TOKEN LIST"))?;
        self.current = TokenList::new(body);
        Ok(())
    }

    pub fn leave(&mut self) -> Result<()> {
        self.current = self.saved.pop()?;
        Ok(())
    }
}

/// Evaluation context shared by every statement of a line.
#[derive(Debug)]
pub struct Context {
    pub queue: Stack<Val>,
    pub stack: Stack<Pending>,
    pub lists: TokenLists,
}

impl Default for Context {
    fn default() -> Context {
        Context {
            queue: Stack::new(QUEUE_LEN, ErrorCode::QueueFull, ErrorCode::QueueEmpty),
            stack: Stack::new(STACK_LEN, ErrorCode::StackFull, ErrorCode::StackFull),
            lists: TokenLists::default(),
        }
    }
}

impl Context {
    pub fn purge(&mut self) {
        self.queue.clear();
        self.stack.clear();
    }

    /// Everything the last evaluation produced, first value first.
    pub fn drain(&mut self) -> Vec<Val> {
        self.queue.split_off(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::token::Lexeme;

    fn list(n: usize) -> Vec<Token> {
        (0..n)
            .map(|i| Token::new(Lexeme::Text(i.to_string().into()), Delim::Colon))
            .collect()
    }

    #[test]
    fn test_precedence() {
        assert!(Pending::Frame.precedence() < Pending::Op(Operator::Or).precedence());
        assert_eq!(Pending::Call(Word::Abs, 0).precedence(), 6);
        assert_eq!(Pending::Op(Operator::Plus).precedence(), 4);
    }

    #[test]
    fn test_enter_and_leave() {
        let mut lists = TokenLists::default();
        lists.reset(list(3));
        lists.advance();
        lists.open();
        lists.enter(list(1).into()).unwrap();
        assert_eq!(lists.level(), 1);
        assert_eq!(lists.ptr(), 0);
        assert_eq!(lists.depth(), 0);
        lists.leave().unwrap();
        assert_eq!(lists.ptr(), 1);
        assert_eq!(lists.depth(), 1);
        assert_eq!(lists.level(), 0);
    }

    #[test]
    fn test_token_list_overflow() {
        let mut lists = TokenLists::default();
        for _ in 0..TOKEN_LIST_DEPTH {
            lists.enter(list(1).into()).unwrap();
        }
        let err = lists.enter(list(1).into()).unwrap_err();
        assert_eq!(err.to_string(), "Stack is full; TOKEN LIST");
    }

    #[test]
    fn test_skip_statement() {
        let mut lists = TokenLists::default();
        lists.reset(list(2));
        assert!(lists.skip_statement());
        assert!(lists.skip_statement());
        assert!(!lists.skip_statement());
        assert_eq!(lists.delim(), Delim::End);
        assert_eq!(lists.close().unwrap_err().code(), ErrorCode::ParMismatch);
    }
}
