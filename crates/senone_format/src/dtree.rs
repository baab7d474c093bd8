//! Decision-tree files.
//!
//! ```text
//! n_node 5
//! 0 1 2 1.25e+02 3.0e+03 ((VOWEL -1)(!NASAL 1 WDBNDRY_B 0))
//! 1 3 4 4.0e+01 1.2e+03 VOWEL 1
//! 2 - - 3.5e+01 1.8e+03
//! 3 - - 2.0e+01 6.0e+02
//! 4 - - 2.0e+01 6.0e+02
//! ```
//!
//! Each node line is `id yes no [entropy occupancy] [question]`; leaves
//! have `-` for both children and no question. Node lines may come in any
//! order; node `0` is the root.
//!
//! A question in parentheses is a disjunction of parenthesized
//! conjunctions. Without parentheses the terms form a single conjunction.
//! Each term is `[!]SET OFFSET` with `OFFSET` one of `-1`, `0`, `1`.

mod lexer;

use std::iter::Peekable;
use std::path::PathBuf;
use std::slice;

use senone_tree::{
    CompoundQuestion, Conjunction, ContextRole, DecisionTree, NodeStats, QuestionCatalog,
    SimpleQuestion, TreeBuilder, TreeLoader, TreeSourceName,
};

use self::lexer::{tokenize, Token};
use crate::{read_text, FormatError};

/// Extension of tree files in a tree directory.
pub const TREE_FILE_EXTENSION: &str = "dtree";

const NODE_COUNT_KEYWORD: &str = "n_node";

/// Loads `<dir>/<phone>-<state>.dtree`.
#[derive(Clone, Debug)]
pub struct DirTreeLoader {
    dir: PathBuf,
}

impl DirTreeLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirTreeLoader { dir: dir.into() }
    }

    /// File a tree is read from.
    pub fn path_for(&self, name: &TreeSourceName) -> PathBuf {
        self.dir.join(format!("{name}.{TREE_FILE_EXTENSION}"))
    }
}

impl TreeLoader for DirTreeLoader {
    type Error = FormatError;

    fn load(
        &self,
        name: &TreeSourceName,
        catalog: &QuestionCatalog,
    ) -> Result<DecisionTree, FormatError> {
        let path = self.path_for(name);
        let text = read_text(&path)?;
        parse_tree(&text, &path.display().to_string(), catalog)
    }
}

/// Parse a tree file. Phone-set names are resolved against `catalog`.
pub fn parse_tree(
    text: &str,
    origin: &str,
    catalog: &QuestionCatalog,
) -> Result<DecisionTree, FormatError> {
    let mut builder: Option<TreeBuilder> = None;
    let mut last_line = 0;

    for (index, text) in text.lines().enumerate() {
        let line = index + 1;
        let malformed = |message: String| FormatError::malformed(origin, line, message);
        let tokens = tokenize(text).map_err(malformed)?;
        if tokens.is_empty() {
            continue;
        }
        last_line = line;

        match builder.as_mut() {
            None => {
                let n_node = parse_node_count(&tokens).map_err(malformed)?;
                builder = Some(TreeBuilder::new(n_node));
            }
            Some(builder) => {
                NodeLine::new(&tokens, catalog)
                    .parse_into(builder)
                    .map_err(malformed)?;
            }
        }
    }

    let Some(builder) = builder else {
        return Err(FormatError::malformed(
            origin,
            last_line,
            format!("expected '{NODE_COUNT_KEYWORD} <count>'"),
        ));
    };
    builder.finish().map_err(|source| FormatError::Tree {
        origin: origin.to_string(),
        source,
    })
}

fn parse_node_count(tokens: &[Token<'_>]) -> Result<usize, String> {
    match tokens {
        [Token::Name(NODE_COUNT_KEYWORD), Token::Int(n)] => {
            usize::try_from(*n).map_err(|_| format!("invalid node count {n}"))
        }
        _ => Err(format!("expected '{NODE_COUNT_KEYWORD} <count>'")),
    }
}

/// Cursor over the tokens of one node line.
struct NodeLine<'t, 'a> {
    tokens: Peekable<slice::Iter<'t, Token<'a>>>,
    catalog: &'t QuestionCatalog,
}

impl<'t, 'a> NodeLine<'t, 'a> {
    fn new(tokens: &'t [Token<'a>], catalog: &'t QuestionCatalog) -> Self {
        NodeLine {
            tokens: tokens.iter().peekable(),
            catalog,
        }
    }

    fn parse_into(mut self, builder: &mut TreeBuilder) -> Result<(), String> {
        let id = self.node_id("node id")?;
        let children = match self.tokens.peek() {
            Some(Token::Dash) => {
                self.expect(Token::Dash, "'-'")?;
                self.expect(Token::Dash, "'-' for the no child of a leaf")?;
                None
            }
            _ => Some((self.node_id("yes child")?, self.node_id("no child")?)),
        };
        let stats = self.stats()?;

        let added = match children {
            None => {
                if let Some(token) = self.tokens.next() {
                    return Err(format!("unexpected {} after leaf {id}", describe(*token)));
                }
                builder.add_leaf(id, stats)
            }
            Some((yes, no)) => {
                let question = self.question()?;
                builder.add_internal(id, question, yes, no, stats)
            }
        };
        added.map_err(|e| e.to_string())
    }

    fn node_id(&mut self, what: &str) -> Result<u32, String> {
        match self.tokens.next() {
            Some(Token::Int(n)) => u32::try_from(*n).map_err(|_| format!("invalid {what} {n}")),
            Some(token) => Err(format!("expected {what}, found {}", describe(*token))),
            None => Err(format!("expected {what}")),
        }
    }

    fn expect(&mut self, expected: Token<'_>, what: &str) -> Result<(), String> {
        match self.tokens.next() {
            Some(token) if *token == expected => Ok(()),
            Some(token) => Err(format!("expected {what}, found {}", describe(*token))),
            None => Err(format!("expected {what}")),
        }
    }

    /// Optional `entropy occupancy` pair.
    fn stats(&mut self) -> Result<NodeStats, String> {
        let Some(entropy) = self.tokens.peek().and_then(|t| t.as_number()) else {
            return Ok(NodeStats::default());
        };
        self.tokens.next();
        let occupancy = self
            .tokens
            .next()
            .and_then(|t| t.as_number())
            .ok_or_else(|| "expected occupancy after entropy".to_string())?;
        Ok(NodeStats { entropy, occupancy })
    }

    fn question(&mut self) -> Result<CompoundQuestion, String> {
        if self.tokens.peek().is_none() {
            return Err("internal node has no question".to_string());
        }
        if self.tokens.next_if_eq(&&Token::LParen).is_none() {
            let conjunction = self.conjunction(None)?;
            return Ok(CompoundQuestion::new(vec![conjunction]));
        }

        let mut conjunctions = Vec::new();
        while self.tokens.next_if_eq(&&Token::LParen).is_some() {
            conjunctions.push(self.conjunction(Some(Token::RParen))?);
        }
        self.expect(Token::RParen, "')' closing the question")?;
        if conjunctions.is_empty() {
            return Err("empty question".to_string());
        }
        self.end()?;
        Ok(CompoundQuestion::new(conjunctions))
    }

    /// Terms up to `close` (consumed), or to the end of the line.
    fn conjunction(&mut self, close: Option<Token<'_>>) -> Result<Conjunction, String> {
        let mut terms = Conjunction::new();
        loop {
            match (self.tokens.peek(), close) {
                (Some(&&token), Some(close)) if token == close => {
                    self.tokens.next();
                    break;
                }
                (None, None) => break,
                (None, Some(_)) => return Err("unclosed conjunction".to_string()),
                _ => terms.push(self.simple()?),
            }
        }
        if terms.is_empty() {
            return Err("empty conjunction".to_string());
        }
        Ok(terms)
    }

    fn simple(&mut self) -> Result<SimpleQuestion, String> {
        let negated = self.tokens.next_if_eq(&&Token::Not).is_some();
        let name = match self.tokens.next() {
            Some(Token::Name(name)) => *name,
            Some(token) => return Err(format!("expected a phone set, found {}", describe(*token))),
            None => return Err("expected a phone set".to_string()),
        };
        let set = self
            .catalog
            .id(name)
            .ok_or_else(|| format!("unknown phone set '{name}'"))?;
        let role = match self.tokens.next() {
            Some(Token::Int(offset)) => ContextRole::from_offset(*offset)
                .ok_or_else(|| format!("context offset must be -1, 0 or 1, found {offset}"))?,
            _ => return Err(format!("expected a context offset after '{name}'")),
        };
        let question = SimpleQuestion::new(set, role);
        Ok(if negated { question.negate() } else { question })
    }

    fn end(&mut self) -> Result<(), String> {
        match self.tokens.next() {
            Some(token) => Err(format!("unexpected {} after the question", describe(*token))),
            None => Ok(()),
        }
    }
}

/// Whether a tree file can refer to a phone set called `name`.
pub(crate) fn is_phone_set_name(name: &str) -> bool {
    matches!(tokenize(name).as_deref(), Ok([Token::Name(n)]) if *n == name)
}

fn describe(token: Token<'_>) -> String {
    match token {
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::Not => "'!'".to_string(),
        Token::Dash => "'-'".to_string(),
        Token::Int(n) => format!("'{n}'"),
        Token::Float(x) => format!("'{x}'"),
        Token::Name(name) => format!("'{name}'"),
    }
}
