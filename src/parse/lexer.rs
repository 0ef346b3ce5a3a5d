pub type Lexer<'a> = logos_iter::PeekableLexer<'a, logos::Lexer<'a, TokenKind>, TokenKind>;

pub fn lexer(s: &str) -> Lexer {
    logos_iter::LogosIter::peekable_lexer(<TokenKind as logos::Logos>::lexer(s))
}

#[derive(logos::Logos, Debug, Copy, Clone, Eq, PartialEq)]
pub enum TokenKind {
    #[regex(r"[0-9]+")]
    Integer,
    #[regex(r"([0-9]+\.[0-9]+)|(\.[0-9]+)")]
    Decimal,

    // `d` doubles as the drop modifier after a die or group; the parser
    // decides by position.
    #[token("d")]
    DieMarker,
    #[token("d%")]
    PercentileSides,
    #[regex(r"dF(\.[12])?")]
    FudgeSides,

    #[token("k")]
    Keep,
    #[token("kh")]
    KeepHighest,
    #[token("kl")]
    KeepLowest,
    #[token("dh")]
    DropHighest,
    #[token("dl")]
    DropLowest,
    #[token("!")]
    Bang,
    #[token("p")]
    Penetrate,
    #[token("r")]
    ReRoll,
    #[token("ro")]
    ReRollOnce,
    #[token("u")]
    Unique,
    #[token("uo")]
    UniqueOnce,
    #[token("cs")]
    CriticalSuccess,
    #[token("cf")]
    CriticalFailure,
    #[token("s")]
    Sort,
    #[token("sa")]
    SortAscending,
    #[token("sd")]
    SortDescending,
    #[token("min")]
    Min,
    #[token("max")]
    Max,
    #[token("f")]
    FailMarker,

    #[token("abs")]
    Abs,
    #[token("ceil")]
    Ceil,
    #[token("cos")]
    Cos,
    #[token("exp")]
    Exp,
    #[token("floor")]
    Floor,
    #[token("log")]
    Log,
    #[token("round")]
    Round,
    #[token("sign")]
    Sign,
    #[token("sin")]
    Sin,
    #[token("sqrt")]
    Sqrt,
    #[token("tan")]
    Tan,
    #[token("pow")]
    Pow,

    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("==")]
    EqualEqual,
    #[token("=")]
    Equal,
    #[token("<>")]
    LessGreater,
    #[token("!=")]
    BangEqual,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,

    #[token("**")]
    StarStar,
    #[token("^")]
    Caret,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,

    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token(",")]
    Comma,

    #[regex(r"(//|#)[^\n]*")]
    InlineDescription,
    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
    BlockDescription,
    #[regex(r"\[[^\]]*\]")]
    BracketDescription,

    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[error]
    Error,
}

impl TokenKind {
    pub fn to_str(self) -> &'static str {
        use TokenKind::*;

        match self {
            Integer => "<integer>",
            Decimal => "<number>",
            DieMarker => "'d'",
            PercentileSides => "'d%'",
            FudgeSides => "'dF'",
            Keep => "'k'",
            KeepHighest => "'kh'",
            KeepLowest => "'kl'",
            DropHighest => "'dh'",
            DropLowest => "'dl'",
            Bang => "'!'",
            Penetrate => "'p'",
            ReRoll => "'r'",
            ReRollOnce => "'ro'",
            Unique => "'u'",
            UniqueOnce => "'uo'",
            CriticalSuccess => "'cs'",
            CriticalFailure => "'cf'",
            Sort => "'s'",
            SortAscending => "'sa'",
            SortDescending => "'sd'",
            Min => "'min'",
            Max => "'max'",
            FailMarker => "'f'",
            Abs | Ceil | Cos | Exp | Floor | Log | Round | Sign | Sin | Sqrt | Tan | Pow => {
                "<function>"
            }
            LessEqual => "'<='",
            GreaterEqual => "'>='",
            EqualEqual => "'=='",
            Equal => "'='",
            LessGreater => "'<>'",
            BangEqual => "'!='",
            Less => "'<'",
            Greater => "'>'",
            StarStar => "'**'",
            Caret => "'^'",
            Star => "'*'",
            Slash => "'/'",
            Percent => "'%'",
            Plus => "'+'",
            Minus => "'-'",
            LeftParen => "'('",
            RightParen => "')'",
            LeftBrace => "'{'",
            RightBrace => "'}'",
            Comma => "','",
            InlineDescription | BlockDescription | BracketDescription => "<description>",
            Error => "<error>",
        }
    }
}
