use serde::{Deserialize, Serialize};
use std::fmt;

/// JVM access flags plus the derived `sealed` bit.
///
/// Bit values match the class file format so flags read from a class file can
/// be wrapped directly. Several bits are shared between member kinds
/// (`0x0040` is `volatile` on fields and `bridge` on methods, `0x0080` is
/// `transient` on fields and `varargs` on methods); only the method meaning
/// is modelled here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Modifiers(u32);

impl Modifiers {
    pub const PUBLIC: u32 = 0x0001;
    pub const PRIVATE: u32 = 0x0002;
    pub const PROTECTED: u32 = 0x0004;
    pub const STATIC: u32 = 0x0008;
    pub const FINAL: u32 = 0x0010;
    pub const SYNCHRONIZED: u32 = 0x0020;
    pub const BRIDGE: u32 = 0x0040;
    pub const VARARGS: u32 = 0x0080;
    pub const NATIVE: u32 = 0x0100;
    pub const INTERFACE: u32 = 0x0200;
    pub const ABSTRACT: u32 = 0x0400;
    pub const STRICT: u32 = 0x0800;
    pub const SYNTHETIC: u32 = 0x1000;
    pub const ANNOTATION: u32 = 0x2000;
    pub const ENUM: u32 = 0x4000;
    /// Not an access flag: set when the class file carries `PermittedSubclasses`.
    pub const SEALED: u32 = 0x0001_0000;

    /// Bits a method declaration may carry in source.
    pub const METHOD_MODIFIERS: u32 = Self::PUBLIC
        | Self::PROTECTED
        | Self::PRIVATE
        | Self::ABSTRACT
        | Self::STATIC
        | Self::FINAL
        | Self::SYNCHRONIZED
        | Self::NATIVE
        | Self::STRICT;

    /// Bits a constructor declaration may carry in source.
    pub const CONSTRUCTOR_MODIFIERS: u32 = Self::PUBLIC | Self::PROTECTED | Self::PRIVATE;

    const KEYWORDS: &'static [(&'static str, u32)] = &[
        ("public", Self::PUBLIC),
        ("protected", Self::PROTECTED),
        ("private", Self::PRIVATE),
        ("abstract", Self::ABSTRACT),
        ("static", Self::STATIC),
        ("final", Self::FINAL),
        ("sealed", Self::SEALED),
        ("synchronized", Self::SYNCHRONIZED),
        ("native", Self::NATIVE),
        ("strictfp", Self::STRICT),
        ("interface", Self::INTERFACE),
        ("annotation", Self::ANNOTATION),
        ("enum", Self::ENUM),
        ("varargs", Self::VARARGS),
        ("bridge", Self::BRIDGE),
        ("synthetic", Self::SYNTHETIC),
    ];

    /// Keywords that are legal in Java source, in `Modifier.toString` order.
    const SOURCE_ORDER: &'static [(&'static str, u32)] = &[
        ("public", Self::PUBLIC),
        ("protected", Self::PROTECTED),
        ("private", Self::PRIVATE),
        ("abstract", Self::ABSTRACT),
        ("static", Self::STATIC),
        ("final", Self::FINAL),
        ("synchronized", Self::SYNCHRONIZED),
        ("native", Self::NATIVE),
        ("strictfp", Self::STRICT),
    ];

    pub const fn empty() -> Self {
        Modifiers(0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        Modifiers(bits)
    }

    pub fn from_access_flags(flags: u16) -> Self {
        Modifiers(u32::from(flags))
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, bits: u32) -> bool {
        self.0 & bits == bits
    }

    pub const fn with(self, bits: u32) -> Self {
        Modifiers(self.0 | bits)
    }

    pub const fn without(self, bits: u32) -> Self {
        Modifiers(self.0 & !bits)
    }

    pub const fn masked(self, mask: u32) -> Self {
        Modifiers(self.0 & mask)
    }

    pub const fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }

    pub const fn is_private(self) -> bool {
        self.contains(Self::PRIVATE)
    }

    pub const fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    pub const fn is_final(self) -> bool {
        self.contains(Self::FINAL)
    }

    pub const fn is_abstract(self) -> bool {
        self.contains(Self::ABSTRACT)
    }

    pub const fn is_sealed(self) -> bool {
        self.contains(Self::SEALED)
    }

    pub const fn is_varargs(self) -> bool {
        self.contains(Self::VARARGS)
    }

    pub const fn is_synthetic(self) -> bool {
        self.contains(Self::SYNTHETIC)
    }

    pub const fn is_bridge(self) -> bool {
        self.contains(Self::BRIDGE)
    }

    pub fn keyword_bits(keyword: &str) -> Option<u32> {
        Self::KEYWORDS
            .iter()
            .find(|(name, _)| *name == keyword)
            .map(|(_, bits)| *bits)
    }

    /// Every set flag as a keyword, used for catalog serialization.
    pub fn keywords(self) -> Vec<&'static str> {
        Self::KEYWORDS
            .iter()
            .filter(|(_, bits)| self.contains(*bits))
            .map(|(name, _)| *name)
            .collect()
    }
}

impl fmt::Display for Modifiers {
    /// Renders only the keywords Java source accepts on members.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = Self::SOURCE_ORDER
            .iter()
            .filter(|(_, bits)| self.contains(*bits))
            .map(|(name, _)| *name)
            .collect();
        f.write_str(&parts.join(" "))
    }
}

impl TryFrom<Vec<String>> for Modifiers {
    type Error = String;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        let mut modifiers = Modifiers::empty();
        for keyword in value {
            let bits = Modifiers::keyword_bits(keyword.trim())
                .ok_or_else(|| format!("unknown modifier '{}'", keyword))?;
            modifiers = modifiers.with(bits);
        }
        Ok(modifiers)
    }
}

impl From<Modifiers> for Vec<String> {
    fn from(value: Modifiers) -> Self {
        value.keywords().into_iter().map(str::to_string).collect()
    }
}
