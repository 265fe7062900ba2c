// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The node type registry.
//!
//! [`SyntaxKind`] is the closed set of discriminants for every leaf token and
//! composite node in a Java syntax tree. [`TokenSet`] is a const bitset over
//! kinds, and the category constants below ([`TRIVIA`], [`MODIFIERS`] and
//! friends) are the tables used for membership tests during parsing,
//! role classification and editing.

use std::fmt;

use serde::Serialize;

macro_rules! syntax_kinds {
    (
        $(
            $(#[$meta:meta])*
            $name:ident
        ),* $(,)?
    ) => {
        /// Discriminant of a syntax tree node.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[repr(u16)]
        pub enum SyntaxKind {
            $(
                $(#[$meta])*
                $name,
            )*
        }

        impl SyntaxKind {
            /// Every kind, indexed by discriminant.
            pub const ALL: &'static [SyntaxKind] = &[$(SyntaxKind::$name,)*];

            /// The variant name, e.g. `"IfStatement"`.
            pub fn name(self) -> &'static str {
                match self {
                    $(SyntaxKind::$name => stringify!($name),)*
                }
            }
        }
    };
}

syntax_kinds! {
    // ------------------------------------------------------------------
    // Trivia
    // ------------------------------------------------------------------
    Whitespace,
    LineComment,
    /// Block and doc comments.
    BlockComment,

    // ------------------------------------------------------------------
    // Names and literals
    // ------------------------------------------------------------------
    Ident,
    IntLiteral,
    LongLiteral,
    FloatLiteral,
    DoubleLiteral,
    CharLiteral,
    StringLiteral,
    TextBlockLiteral,

    // ------------------------------------------------------------------
    // Keywords
    // ------------------------------------------------------------------
    AbstractKw,
    AssertKw,
    BooleanKw,
    BreakKw,
    ByteKw,
    CaseKw,
    CatchKw,
    CharKw,
    ClassKw,
    ConstKw,
    ContinueKw,
    DefaultKw,
    DoKw,
    DoubleKw,
    ElseKw,
    EnumKw,
    ExtendsKw,
    FinalKw,
    FinallyKw,
    FloatKw,
    ForKw,
    GotoKw,
    IfKw,
    ImplementsKw,
    ImportKw,
    InstanceofKw,
    IntKw,
    InterfaceKw,
    LongKw,
    NativeKw,
    NewKw,
    PackageKw,
    PrivateKw,
    ProtectedKw,
    PublicKw,
    ReturnKw,
    ShortKw,
    StaticKw,
    StrictfpKw,
    SuperKw,
    SwitchKw,
    SynchronizedKw,
    ThisKw,
    ThrowKw,
    ThrowsKw,
    TransientKw,
    TryKw,
    VoidKw,
    VolatileKw,
    WhileKw,
    TrueKw,
    FalseKw,
    NullKw,

    // Restricted identifiers. The tokenizer yields `Ident`; the parser
    // retags the token when it is used as a keyword.
    RecordKw,
    YieldKw,
    PermitsKw,
    SealedKw,
    WhenKw,

    // ------------------------------------------------------------------
    // Punctuation
    // ------------------------------------------------------------------
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    At,
    ColonColon,

    // ------------------------------------------------------------------
    // Operators
    // ------------------------------------------------------------------
    Eq,
    EqEq,
    Ne,
    Lt,
    Le,
    /// A single `>`. Shift operators are glued from adjacent `>` tokens by the
    /// parser so that nested type arguments close correctly.
    Gt,
    Ge,
    Bang,
    Tilde,
    Question,
    Colon,
    Arrow,
    AndAnd,
    OrOr,
    PlusPlus,
    MinusMinus,
    Plus,
    Minus,
    Star,
    Slash,
    Amp,
    Pipe,
    Caret,
    Percent,
    LtLt,
    GtGt,
    GtGtGt,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    AmpEq,
    PipeEq,
    CaretEq,
    PercentEq,
    LtLtEq,
    GtGtEq,
    GtGtGtEq,

    /// A character the tokenizer could not classify.
    Error,

    // ------------------------------------------------------------------
    // Files and declarations
    // ------------------------------------------------------------------
    JavaFile,
    /// Holder for a fragment parsed on its own (statement, expression, ...).
    DummyHolder,
    PackageStatement,
    ImportList,
    ImportStatement,
    /// Class, interface, enum or record declaration.
    Class,
    AnonymousClass,
    EnumConstant,
    EnumConstantInitializer,
    RecordHeader,
    RecordComponent,
    Method,
    Field,
    ClassInitializer,
    LocalVariable,
    Parameter,
    ParameterList,
    TypeParameterList,
    TypeParameter,
    ExtendsList,
    ImplementsList,
    ThrowsList,
    PermitsList,
    ExtendsBoundList,
    ModifierList,
    Annotation,
    AnnotationParameterList,
    NameValuePair,
    AnnotationArrayInitializer,
    JavaCodeReference,
    ReferenceParameterList,
    Type,

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------
    CodeBlock,
    BlockStatement,
    DeclarationStatement,
    ExpressionStatement,
    ExpressionListStatement,
    EmptyStatement,
    IfStatement,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    ForeachStatement,
    ForeachPatternStatement,
    SwitchStatement,
    SwitchLabelStatement,
    SwitchLabeledRule,
    CaseLabelElementList,
    DefaultCaseLabelElement,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    ThrowStatement,
    YieldStatement,
    TryStatement,
    ResourceList,
    ResourceVariable,
    ResourceExpression,
    CatchSection,
    LabeledStatement,
    SynchronizedStatement,
    AssertStatement,

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------
    ReferenceExpression,
    LiteralExpression,
    ParenthExpression,
    MethodCallExpression,
    ExpressionList,
    NewExpression,
    ArrayInitializerExpression,
    ArrayAccessExpression,
    TypeCastExpression,
    PrefixExpression,
    PostfixExpression,
    BinaryExpression,
    PolyadicExpression,
    ConditionalExpression,
    AssignmentExpression,
    InstanceofExpression,
    LambdaExpression,
    MethodRefExpression,
    ThisExpression,
    SuperExpression,
    ClassObjectAccessExpression,
    SwitchExpression,

    // ------------------------------------------------------------------
    // Patterns
    // ------------------------------------------------------------------
    TypeTestPattern,
    PatternVariable,
    DeconstructionPattern,
    DeconstructionList,
    UnnamedPattern,
}

/// Structural category of a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Trivia,
    Token,
    Expression,
    Statement,
    Pattern,
    Declaration,
    List,
    Other,
}

impl SyntaxKind {
    /// Convert a raw discriminant back to a kind.
    ///
    /// # Panics
    /// Panics on a discriminant outside the registry. Producers must only
    /// hand out registered kinds, so this is a programming error.
    pub fn from_raw(raw: u16) -> SyntaxKind {
        match Self::try_from_raw(raw) {
            Some(kind) => kind,
            None => panic!("unknown syntax kind discriminant {}", raw),
        }
    }

    /// Convert a raw discriminant back to a kind, if registered.
    pub fn try_from_raw(raw: u16) -> Option<SyntaxKind> {
        Self::ALL.get(raw as usize).copied()
    }

    /// Look a kind up by name. Case and underscores are ignored, so
    /// `"if_statement"` and `"IfStatement"` both work.
    pub fn from_name(name: &str) -> Option<SyntaxKind> {
        let wanted: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().to_ascii_lowercase() == wanted)
    }

    /// Raw discriminant.
    pub fn raw(self) -> u16 {
        self as u16
    }

    /// Is this a leaf kind?
    pub fn is_token(self) -> bool {
        self < SyntaxKind::JavaFile
    }

    /// Whitespace or comment.
    pub fn is_trivia(self) -> bool {
        TRIVIA.contains(self)
    }

    pub fn is_keyword(self) -> bool {
        KEYWORDS.contains(self)
    }

    pub fn is_expression(self) -> bool {
        EXPRESSIONS.contains(self)
    }

    pub fn is_statement(self) -> bool {
        STATEMENTS.contains(self)
    }

    pub fn is_pattern(self) -> bool {
        PATTERNS.contains(self)
    }

    /// The single structural category this kind belongs to.
    pub fn category(self) -> Category {
        if TRIVIA.contains(self) {
            Category::Trivia
        } else if self.is_token() {
            Category::Token
        } else if EXPRESSIONS.contains(self) {
            Category::Expression
        } else if STATEMENTS.contains(self) {
            Category::Statement
        } else if PATTERNS.contains(self) {
            Category::Pattern
        } else if DECLARATIONS.contains(self) {
            Category::Declaration
        } else if LISTS.contains(self) {
            Category::List
        } else {
            Category::Other
        }
    }

    /// Keyword for a reserved word, if `text` is one.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        use SyntaxKind::*;
        let kind = match text {
            "abstract" => AbstractKw,
            "assert" => AssertKw,
            "boolean" => BooleanKw,
            "break" => BreakKw,
            "byte" => ByteKw,
            "case" => CaseKw,
            "catch" => CatchKw,
            "char" => CharKw,
            "class" => ClassKw,
            "const" => ConstKw,
            "continue" => ContinueKw,
            "default" => DefaultKw,
            "do" => DoKw,
            "double" => DoubleKw,
            "else" => ElseKw,
            "enum" => EnumKw,
            "extends" => ExtendsKw,
            "final" => FinalKw,
            "finally" => FinallyKw,
            "float" => FloatKw,
            "for" => ForKw,
            "goto" => GotoKw,
            "if" => IfKw,
            "implements" => ImplementsKw,
            "import" => ImportKw,
            "instanceof" => InstanceofKw,
            "int" => IntKw,
            "interface" => InterfaceKw,
            "long" => LongKw,
            "native" => NativeKw,
            "new" => NewKw,
            "package" => PackageKw,
            "private" => PrivateKw,
            "protected" => ProtectedKw,
            "public" => PublicKw,
            "return" => ReturnKw,
            "short" => ShortKw,
            "static" => StaticKw,
            "strictfp" => StrictfpKw,
            "super" => SuperKw,
            "switch" => SwitchKw,
            "synchronized" => SynchronizedKw,
            "this" => ThisKw,
            "throw" => ThrowKw,
            "throws" => ThrowsKw,
            "transient" => TransientKw,
            "try" => TryKw,
            "void" => VoidKw,
            "volatile" => VolatileKw,
            "while" => WhileKw,
            "true" => TrueKw,
            "false" => FalseKw,
            "null" => NullKw,
            _ => return None,
        };
        Some(kind)
    }

    /// Source text of a fixed-spelling token (keywords, punctuation, operators).
    pub fn fixed_text(self) -> Option<&'static str> {
        use SyntaxKind::*;
        let text = match self {
            AbstractKw => "abstract",
            AssertKw => "assert",
            BooleanKw => "boolean",
            BreakKw => "break",
            ByteKw => "byte",
            CaseKw => "case",
            CatchKw => "catch",
            CharKw => "char",
            ClassKw => "class",
            ConstKw => "const",
            ContinueKw => "continue",
            DefaultKw => "default",
            DoKw => "do",
            DoubleKw => "double",
            ElseKw => "else",
            EnumKw => "enum",
            ExtendsKw => "extends",
            FinalKw => "final",
            FinallyKw => "finally",
            FloatKw => "float",
            ForKw => "for",
            GotoKw => "goto",
            IfKw => "if",
            ImplementsKw => "implements",
            ImportKw => "import",
            InstanceofKw => "instanceof",
            IntKw => "int",
            InterfaceKw => "interface",
            LongKw => "long",
            NativeKw => "native",
            NewKw => "new",
            PackageKw => "package",
            PrivateKw => "private",
            ProtectedKw => "protected",
            PublicKw => "public",
            ReturnKw => "return",
            ShortKw => "short",
            StaticKw => "static",
            StrictfpKw => "strictfp",
            SuperKw => "super",
            SwitchKw => "switch",
            SynchronizedKw => "synchronized",
            ThisKw => "this",
            ThrowKw => "throw",
            ThrowsKw => "throws",
            TransientKw => "transient",
            TryKw => "try",
            VoidKw => "void",
            VolatileKw => "volatile",
            WhileKw => "while",
            TrueKw => "true",
            FalseKw => "false",
            NullKw => "null",
            RecordKw => "record",
            YieldKw => "yield",
            PermitsKw => "permits",
            SealedKw => "sealed",
            WhenKw => "when",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            LBracket => "[",
            RBracket => "]",
            Semicolon => ";",
            Comma => ",",
            Dot => ".",
            Ellipsis => "...",
            At => "@",
            ColonColon => "::",
            Eq => "=",
            EqEq => "==",
            Ne => "!=",
            Lt => "<",
            Le => "<=",
            Gt => ">",
            Ge => ">=",
            Bang => "!",
            Tilde => "~",
            Question => "?",
            Colon => ":",
            Arrow => "->",
            AndAnd => "&&",
            OrOr => "||",
            PlusPlus => "++",
            MinusMinus => "--",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Amp => "&",
            Pipe => "|",
            Caret => "^",
            Percent => "%",
            LtLt => "<<",
            GtGt => ">>",
            GtGtGt => ">>>",
            PlusEq => "+=",
            MinusEq => "-=",
            StarEq => "*=",
            SlashEq => "/=",
            AmpEq => "&=",
            PipeEq => "|=",
            CaretEq => "^=",
            PercentEq => "%=",
            LtLtEq => "<<=",
            GtGtEq => ">>=",
            GtGtGtEq => ">>>=",
            _ => return None,
        };
        Some(text)
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// TokenSet
// ============================================================================

/// A const bitset over [`SyntaxKind`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenSet([u64; 4]);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet([0; 4]);

    pub const fn new(kinds: &[SyntaxKind]) -> TokenSet {
        let mut bits = [0u64; 4];
        let mut i = 0;
        while i < kinds.len() {
            let raw = kinds[i] as usize;
            bits[raw / 64] |= 1u64 << (raw % 64);
            i += 1;
        }
        TokenSet(bits)
    }

    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet([
            self.0[0] | other.0[0],
            self.0[1] | other.0[1],
            self.0[2] | other.0[2],
            self.0[3] | other.0[3],
        ])
    }

    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let raw = kind as usize;
        self.0[raw / 64] & (1u64 << (raw % 64)) != 0
    }

    /// Iterate the kinds in the set in discriminant order.
    pub fn iter(self) -> impl Iterator<Item = SyntaxKind> {
        SyntaxKind::ALL
            .iter()
            .copied()
            .filter(move |kind| self.contains(*kind))
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

use SyntaxKind::*;

pub const TRIVIA: TokenSet = TokenSet::new(&[Whitespace, LineComment, BlockComment]);

pub const LITERALS: TokenSet = TokenSet::new(&[
    IntLiteral,
    LongLiteral,
    FloatLiteral,
    DoubleLiteral,
    CharLiteral,
    StringLiteral,
    TextBlockLiteral,
    TrueKw,
    FalseKw,
    NullKw,
]);

pub const KEYWORDS: TokenSet = TokenSet::new(&[
    AbstractKw,
    AssertKw,
    BooleanKw,
    BreakKw,
    ByteKw,
    CaseKw,
    CatchKw,
    CharKw,
    ClassKw,
    ConstKw,
    ContinueKw,
    DefaultKw,
    DoKw,
    DoubleKw,
    ElseKw,
    EnumKw,
    ExtendsKw,
    FinalKw,
    FinallyKw,
    FloatKw,
    ForKw,
    GotoKw,
    IfKw,
    ImplementsKw,
    ImportKw,
    InstanceofKw,
    IntKw,
    InterfaceKw,
    LongKw,
    NativeKw,
    NewKw,
    PackageKw,
    PrivateKw,
    ProtectedKw,
    PublicKw,
    ReturnKw,
    ShortKw,
    StaticKw,
    StrictfpKw,
    SuperKw,
    SwitchKw,
    SynchronizedKw,
    ThisKw,
    ThrowKw,
    ThrowsKw,
    TransientKw,
    TryKw,
    VoidKw,
    VolatileKw,
    WhileKw,
    TrueKw,
    FalseKw,
    NullKw,
]);

pub const MODIFIERS: TokenSet = TokenSet::new(&[
    PublicKw,
    ProtectedKw,
    PrivateKw,
    StaticKw,
    AbstractKw,
    FinalKw,
    NativeKw,
    SynchronizedKw,
    TransientKw,
    VolatileKw,
    StrictfpKw,
    DefaultKw,
    SealedKw,
]);

pub const PRIMITIVE_TYPES: TokenSet = TokenSet::new(&[
    BooleanKw, ByteKw, CharKw, ShortKw, IntKw, LongKw, FloatKw, DoubleKw, VoidKw,
]);

pub const ASSIGNMENT_OPS: TokenSet = TokenSet::new(&[
    Eq, PlusEq, MinusEq, StarEq, SlashEq, AmpEq, PipeEq, CaretEq, PercentEq, LtLtEq, GtGtEq,
    GtGtGtEq,
]);

/// Operators of binary and polyadic expressions.
pub const BINARY_OPS: TokenSet = TokenSet::new(&[
    OrOr, AndAnd, Pipe, Caret, Amp, EqEq, Ne, Lt, Gt, Le, Ge, LtLt, GtGt, GtGtGt, Plus, Minus,
    Star, Slash, Percent,
]);

pub const PREFIX_OPS: TokenSet =
    TokenSet::new(&[Plus, Minus, PlusPlus, MinusMinus, Bang, Tilde]);

pub const POSTFIX_OPS: TokenSet = TokenSet::new(&[PlusPlus, MinusMinus]);

pub const EXPRESSIONS: TokenSet = TokenSet::new(&[
    ReferenceExpression,
    LiteralExpression,
    ParenthExpression,
    MethodCallExpression,
    NewExpression,
    ArrayInitializerExpression,
    ArrayAccessExpression,
    TypeCastExpression,
    PrefixExpression,
    PostfixExpression,
    BinaryExpression,
    PolyadicExpression,
    ConditionalExpression,
    AssignmentExpression,
    InstanceofExpression,
    LambdaExpression,
    MethodRefExpression,
    ThisExpression,
    SuperExpression,
    ClassObjectAccessExpression,
    SwitchExpression,
]);

pub const STATEMENTS: TokenSet = TokenSet::new(&[
    BlockStatement,
    DeclarationStatement,
    ExpressionStatement,
    ExpressionListStatement,
    EmptyStatement,
    IfStatement,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    ForeachStatement,
    ForeachPatternStatement,
    SwitchStatement,
    SwitchLabelStatement,
    SwitchLabeledRule,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    ThrowStatement,
    YieldStatement,
    TryStatement,
    LabeledStatement,
    SynchronizedStatement,
    AssertStatement,
]);

/// Statements that `break` without a label may exit.
pub const BREAKABLE: TokenSet = TokenSet::new(&[
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    ForeachStatement,
    ForeachPatternStatement,
    SwitchStatement,
]);

pub const LOOPS: TokenSet = TokenSet::new(&[
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    ForeachStatement,
    ForeachPatternStatement,
]);

pub const PATTERNS: TokenSet =
    TokenSet::new(&[TypeTestPattern, DeconstructionPattern, UnnamedPattern]);

pub const DECLARATIONS: TokenSet = TokenSet::new(&[
    Class,
    AnonymousClass,
    EnumConstant,
    EnumConstantInitializer,
    RecordComponent,
    Method,
    Field,
    ClassInitializer,
    LocalVariable,
    Parameter,
    TypeParameter,
    ResourceVariable,
    PatternVariable,
]);

/// Declarations that bind a variable name.
pub const VARIABLES: TokenSet = TokenSet::new(&[
    LocalVariable,
    Parameter,
    Field,
    ResourceVariable,
    PatternVariable,
    RecordComponent,
    EnumConstant,
]);

/// Bodies that hold class members.
pub const CLASS_BODIES: TokenSet =
    TokenSet::new(&[Class, AnonymousClass, EnumConstantInitializer]);

pub const LISTS: TokenSet = TokenSet::new(&[
    ImportList,
    ParameterList,
    TypeParameterList,
    ExtendsList,
    ImplementsList,
    ThrowsList,
    PermitsList,
    ExtendsBoundList,
    ModifierList,
    AnnotationParameterList,
    AnnotationArrayInitializer,
    ExpressionList,
    ReferenceParameterList,
    ResourceList,
    CaseLabelElementList,
    DeconstructionList,
    RecordHeader,
]);
