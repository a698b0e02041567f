use std::str::FromStr;

use vitalog_types::HealthRecord;

use crate::error::{Error, Result};

/// Comparison operator in a `WHERE` condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Lt,
    Gt,
    Eq,
    Le,
    Ge,
}

impl CmpOp {
    fn compare(self, left: f64, right: f64) -> bool {
        match self {
            CmpOp::Lt => left < right,
            CmpOp::Gt => left > right,
            CmpOp::Eq => left == right,
            CmpOp::Le => left <= right,
            CmpOp::Ge => left >= right,
        }
    }
}

impl FromStr for CmpOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "<" => Ok(CmpOp::Lt),
            ">" => Ok(CmpOp::Gt),
            "=" => Ok(CmpOp::Eq),
            "<=" => Ok(CmpOp::Le),
            ">=" => Ok(CmpOp::Ge),
            _ => Err(Error::Syntax(format!("unknown operator {:?}", s))),
        }
    }
}

/// `WHERE field op literal`. The literal is always numeric; conditions on
/// non-numeric fields are legal but never exclude anything.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: CmpOp,
    pub value: f64,
}

impl Condition {
    /// A record passes when its field is non-numeric (the filter is a
    /// no-op there, records are retained, not excluded) or when the
    /// comparison holds.
    fn matches(&self, record: &HealthRecord) -> bool {
        match record.numeric_field(&self.field) {
            Some(value) => self.op.compare(value, self.value),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// `ORDER BY field [ASC|DESC]`. Sorting is stable; fields that are missing
/// or non-numeric compare as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// A parsed query: optional filter, sort, and row cap, applied in that
/// order. Produced only by [`Query::from_str`]; evaluation cannot fail.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub filter: Option<Condition>,
    pub order: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    /// Evaluate against a record collection. Deterministic: same records
    /// and same query always produce the same rows in the same order.
    pub fn evaluate(&self, records: &[HealthRecord]) -> Vec<HealthRecord> {
        let mut rows: Vec<HealthRecord> = records.to_vec();

        if let Some(condition) = &self.filter {
            rows.retain(|record| condition.matches(record));
        }

        if let Some(order) = &self.order {
            rows.sort_by(|a, b| {
                let left = a.numeric_field(&order.field).unwrap_or(0.0);
                let right = b.numeric_field(&order.field).unwrap_or(0.0);
                let ordering = left.total_cmp(&right);
                match order.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }

        rows
    }
}

impl FromStr for Query {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        Parser::new(input).parse()
    }
}

/// Single token of query text. The language is whitespace-separated, so
/// tokenization is classification of whitespace-split words.
#[derive(Debug, Clone, PartialEq)]
enum Token {
    /// SELECT, FROM, WHERE, ORDER, BY, LIMIT, ASC, DESC (case-insensitive)
    Keyword(Keyword),
    /// Field or table name, lowercased
    Ident(String),
    /// Numeric literal
    Number(f64),
    /// Comparison operator
    Op(CmpOp),
    /// Anything else (kept verbatim for error messages and the
    /// limit-argument rule)
    Word(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Select,
    From,
    Where,
    Order,
    By,
    Limit,
    Asc,
    Desc,
}

fn tokenize(input: &str) -> Vec<Token> {
    input
        .split_whitespace()
        .map(|word| {
            let upper = word.to_uppercase();
            let keyword = match upper.as_str() {
                "SELECT" => Some(Keyword::Select),
                "FROM" => Some(Keyword::From),
                "WHERE" => Some(Keyword::Where),
                "ORDER" => Some(Keyword::Order),
                "BY" => Some(Keyword::By),
                "LIMIT" => Some(Keyword::Limit),
                "ASC" => Some(Keyword::Asc),
                "DESC" => Some(Keyword::Desc),
                _ => None,
            };
            if let Some(keyword) = keyword {
                return Token::Keyword(keyword);
            }
            if let Ok(op) = word.parse::<CmpOp>() {
                return Token::Op(op);
            }
            if let Ok(number) = word.parse::<f64>() {
                return Token::Number(number);
            }
            if is_ident(word) {
                Token::Ident(word.to_lowercase())
            } else {
                Token::Word(word.to_string())
            }
        })
        .collect()
}

fn is_ident(word: &str) -> bool {
    !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '*')
}

/// Recursive-descent parser over the token stream. Clauses come in a fixed
/// order and each appears at most once; anything left over is an error.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            tokens: tokenize(input),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.peek() == Some(&Token::Keyword(keyword)) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn expect_ident(&mut self, what: &str) -> Result<String> {
        match self.next() {
            Some(Token::Ident(name)) => Ok(name),
            other => Err(Error::Syntax(format!(
                "expected {}, found {}",
                what,
                describe(other.as_ref())
            ))),
        }
    }

    fn parse(mut self) -> Result<Query> {
        self.skip_select_preamble()?;

        let filter = self.parse_where()?;
        let order = self.parse_order_by()?;
        let limit = self.parse_limit()?;

        if let Some(extra) = self.peek() {
            return Err(Error::Syntax(format!(
                "unexpected {}",
                describe(Some(extra))
            )));
        }

        Ok(Query {
            filter,
            order,
            limit,
        })
    }

    /// The client has always prefixed queries with `SELECT * FROM <table>`;
    /// the projection and table name carry no meaning here, so the whole
    /// preamble is validated and discarded.
    fn skip_select_preamble(&mut self) -> Result<()> {
        if !self.eat_keyword(Keyword::Select) {
            return Ok(());
        }
        loop {
            match self.next() {
                Some(Token::Keyword(Keyword::From)) => break,
                Some(Token::Ident(_)) | Some(Token::Op(_)) => continue,
                other => {
                    return Err(Error::Syntax(format!(
                        "expected FROM after SELECT, found {}",
                        describe(other.as_ref())
                    )))
                }
            }
        }
        self.expect_ident("table name after FROM")?;
        Ok(())
    }

    fn parse_where(&mut self) -> Result<Option<Condition>> {
        if !self.eat_keyword(Keyword::Where) {
            return Ok(None);
        }
        let field = self.expect_ident("field name after WHERE")?;
        let op = match self.next() {
            Some(Token::Op(op)) => op,
            other => {
                return Err(Error::Syntax(format!(
                    "expected comparison operator, found {}",
                    describe(other.as_ref())
                )))
            }
        };
        let value = match self.next() {
            Some(Token::Number(value)) => value,
            other => {
                return Err(Error::Syntax(format!(
                    "expected numeric literal, found {}",
                    describe(other.as_ref())
                )))
            }
        };
        Ok(Some(Condition { field, op, value }))
    }

    fn parse_order_by(&mut self) -> Result<Option<OrderBy>> {
        if !self.eat_keyword(Keyword::Order) {
            return Ok(None);
        }
        if !self.eat_keyword(Keyword::By) {
            return Err(Error::Syntax("expected BY after ORDER".to_string()));
        }
        let field = self.expect_ident("field name after ORDER BY")?;
        let direction = if self.eat_keyword(Keyword::Asc) {
            Direction::Asc
        } else if self.eat_keyword(Keyword::Desc) {
            Direction::Desc
        } else {
            Direction::default()
        };
        Ok(Some(OrderBy { field, direction }))
    }

    /// `LIMIT` with a non-integer or missing argument is ignored rather
    /// than rejected; the argument token is still consumed.
    fn parse_limit(&mut self) -> Result<Option<usize>> {
        if !self.eat_keyword(Keyword::Limit) {
            return Ok(None);
        }
        match self.next() {
            Some(Token::Number(value)) if value >= 0.0 && value.fract() == 0.0 => {
                Ok(Some(value as usize))
            }
            _ => Ok(None),
        }
    }
}

fn describe(token: Option<&Token>) -> String {
    match token {
        None => "end of query".to_string(),
        Some(Token::Keyword(keyword)) => format!("keyword {:?}", keyword),
        Some(Token::Ident(name)) => format!("{:?}", name),
        Some(Token::Number(value)) => format!("number {}", value),
        Some(Token::Op(_)) => "operator".to_string(),
        Some(Token::Word(word)) => format!("{:?}", word),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use vitalog_types::FoodQuality;

    fn record(stress: u8, sleep: f64, timestamp: i64) -> HealthRecord {
        HealthRecord {
            id: Uuid::new_v4(),
            timestamp,
            sleep,
            water: 5,
            stress,
            energy: 6,
            discomfort: "tired".to_string(),
            food_quality: FoodQuality::Balanced,
        }
    }

    /// stress = [3,8,9,2,7], sleep = [8,5,6,7,4], timestamps ascending.
    fn fixture() -> Vec<HealthRecord> {
        vec![
            record(3, 8.0, 1),
            record(8, 5.0, 2),
            record(9, 6.0, 3),
            record(2, 7.0, 4),
            record(7, 4.0, 5),
        ]
    }

    #[test]
    fn filter_sort_limit_pipeline() {
        let records = fixture();
        let result = crate::run_query(&records, "WHERE stress > 5 ORDER BY sleep DESC LIMIT 2")
            .unwrap();

        // Filtered subset {8,9,7}, sorted desc by sleep {6,5,4}, capped at 2.
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].stress, 9);
        assert_eq!(result[0].sleep, 6.0);
        assert_eq!(result[1].stress, 8);
        assert_eq!(result[1].sleep, 5.0);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let records = fixture();
        let first = crate::run_query(&records, "WHERE stress > 5 ORDER BY sleep DESC LIMIT 2")
            .unwrap();
        for _ in 0..10 {
            let again =
                crate::run_query(&records, "WHERE stress > 5 ORDER BY sleep DESC LIMIT 2")
                    .unwrap();
            assert_eq!(again, first);
        }
    }

    #[test]
    fn non_numeric_field_filter_is_a_no_op() {
        let records = fixture();
        let result = crate::run_query(&records, "WHERE discomfort < 5").unwrap();
        assert_eq!(result, records);
    }

    #[test]
    fn unknown_field_filter_retains_everything() {
        let records = fixture();
        let result = crate::run_query(&records, "WHERE mood > 3").unwrap();
        assert_eq!(result, records);
    }

    #[test]
    fn select_preamble_is_accepted_and_ignored() {
        let records = fixture();
        let bare = crate::run_query(&records, "WHERE sleep < 7").unwrap();
        let prefixed =
            crate::run_query(&records, "SELECT * FROM health_history WHERE sleep < 7").unwrap();
        assert_eq!(bare, prefixed);

        let all = crate::run_query(&records, "SELECT * FROM health_history").unwrap();
        assert_eq!(all, records);
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let records = fixture();
        let result = crate::run_query(&records, "where stress > 5 order by sleep desc limit 2")
            .unwrap();
        assert_eq!(result[0].stress, 9);
    }

    #[test]
    fn order_by_defaults_ascending() {
        let records = fixture();
        let result = crate::run_query(&records, "ORDER BY sleep").unwrap();
        let sleeps: Vec<f64> = result.iter().map(|r| r.sleep).collect();
        assert_eq!(sleeps, vec![4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn order_by_non_numeric_field_keeps_input_order() {
        // Non-numeric sort keys all read as 0; stable sort changes nothing.
        let records = fixture();
        let result = crate::run_query(&records, "ORDER BY discomfort").unwrap();
        assert_eq!(result, records);
    }

    #[test]
    fn limit_with_non_numeric_argument_is_ignored() {
        let records = fixture();
        let result = crate::run_query(&records, "LIMIT soon").unwrap();
        assert_eq!(result.len(), 5);

        let trailing = crate::run_query(&records, "WHERE stress > 5 LIMIT").unwrap();
        assert_eq!(trailing.len(), 3);
    }

    #[test]
    fn limit_zero_empties_the_result() {
        let records = fixture();
        let result = crate::run_query(&records, "LIMIT 0").unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn empty_query_returns_everything_unchanged() {
        let records = fixture();
        assert_eq!(crate::run_query(&records, "").unwrap(), records);
        assert_eq!(crate::run_query(&records, "   ").unwrap(), records);
    }

    #[test]
    fn malformed_queries_are_syntax_errors() {
        let records = fixture();
        for input in [
            "WHERE stress",
            "WHERE stress >",
            "WHERE stress > high",
            "WHERE stress ! 5",
            "ORDER sleep",
            "ORDER BY",
            "WHERE stress > 5 garbage",
            "LIMIT 2 3",
            "SELECT * health_history",
        ] {
            let err = crate::run_query(&records, input).unwrap_err();
            assert!(
                err.to_string().starts_with("query syntax error"),
                "{:?} should be a syntax error, got {}",
                input,
                err
            );
        }
    }

    #[test]
    fn clauses_must_come_in_fixed_order() {
        let records = fixture();
        assert!(crate::run_query(&records, "ORDER BY sleep WHERE stress > 5").is_err());
        assert!(crate::run_query(&records, "LIMIT 2 ORDER BY sleep").is_err());
    }

    #[test]
    fn filter_comparison_operators() {
        let records = fixture();
        assert_eq!(crate::run_query(&records, "WHERE stress = 7").unwrap().len(), 1);
        assert_eq!(crate::run_query(&records, "WHERE stress <= 3").unwrap().len(), 2);
        assert_eq!(crate::run_query(&records, "WHERE stress >= 8").unwrap().len(), 2);
        assert_eq!(crate::run_query(&records, "WHERE sleep < 6").unwrap().len(), 2);
    }

    #[test]
    fn stable_sort_preserves_tied_rows() {
        let mut records = fixture();
        // Two records tie on water (all do); order by water must not
        // reshuffle them.
        records.truncate(3);
        let result = crate::run_query(&records, "ORDER BY water").unwrap();
        assert_eq!(result, records);
    }
}
