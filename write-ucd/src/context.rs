//! The explicit build configuration passed to the assembler.

use ucd_types::{Tag, UnicodeVersion};

use crate::validate::{Validate, ValidationCtx};

/// Whether a build may proceed without a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Requirement {
    /// The build fails if this table has no data.
    Required,
    /// The table is left out of the directory if it has no data.
    Optional,
}

/// One entry in the table registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TableSpec {
    /// The table's identifier in the directory.
    pub tag: Tag,
    /// The name of the property the table is built from.
    pub property: &'static str,
    /// Other names the property is known by.
    pub aliases: &'static [&'static str],
    /// Whether the table may be omitted.
    pub requirement: Requirement,
}

impl TableSpec {
    /// A table the build cannot do without.
    pub const fn required(tag: &[u8; 4], property: &'static str) -> Self {
        TableSpec {
            tag: Tag::new(tag),
            property,
            aliases: &[],
            requirement: Requirement::Required,
        }
    }

    /// A table that is skipped when it has no data.
    pub const fn optional(tag: &[u8; 4], property: &'static str) -> Self {
        TableSpec {
            requirement: Requirement::Optional,
            ..TableSpec::required(tag, property)
        }
    }

    /// Add alternative names for the property.
    pub const fn with_aliases(self, aliases: &'static [&'static str]) -> Self {
        TableSpec { aliases, ..self }
    }

    /// `true` if `name` is this table's property or one of its aliases.
    pub fn matches(&self, name: &str) -> bool {
        self.property == name || self.aliases.iter().any(|alias| *alias == name)
    }
}

/// The tables of a standard build, in directory order.
pub static STANDARD_TABLES: &[TableSpec] = &[
    TableSpec::required(b"blok", "Block"),
    TableSpec::required(b"strn", "Strings"),
    TableSpec::required(b"name", "Name"),
    TableSpec::required(b"alis", "Name_Alias"),
    TableSpec::required(b"u1nm", "Unicode_1_Name"),
    TableSpec::required(b"isoc", "ISO_Comment"),
    TableSpec::required(b"genc", "General_Category"),
    TableSpec::required(b"CASE", "Uppercase_Mapping"),
    TableSpec::required(b"case", "Lowercase_Mapping"),
    TableSpec::required(b"Case", "Titlecase_Mapping"),
    TableSpec::required(b"csef", "Case_Folding"),
    TableSpec::required(b"kccf", "NFKC_Casefold"),
    TableSpec::required(b"nfkc", "FC_NFKC_Closure"),
    TableSpec::required(b"ccc ", "Canonical_Combining_Class"),
    TableSpec::required(b"jamo", "Hangul_Syllable_Type"),
    TableSpec::required(b"numb", "Numeric_Value"),
    TableSpec::required(b"bidi", "Bidi_Class"),
    TableSpec::required(b"deco", "Decomposition_Mapping"),
    TableSpec::required(b"mirr", "Bidi_Mirroring_Glyph"),
    TableSpec::required(b"brak", "Bidi_Paired_Bracket"),
    TableSpec::required(b"age ", "Age"),
    TableSpec::required(b"scpt", "Script"),
    TableSpec::required(b"cqc ", "NFC_Quick_Check"),
    TableSpec::required(b"kcqc", "NFKC_Quick_Check"),
    TableSpec::required(b"dqc ", "NFD_Quick_Check"),
    TableSpec::required(b"kdqc", "NFKD_Quick_Check"),
    TableSpec::required(b"join", "Joining_Type"),
    TableSpec::required(b"lbrk", "Line_Break"),
    TableSpec::required(b"gbrk", "Grapheme_Cluster_Break"),
    TableSpec::required(b"sbrk", "Sentence_Break"),
    TableSpec::required(b"wbrk", "Word_Break"),
    TableSpec::required(b"eaw ", "East_Asian_Width"),
    TableSpec::required(b"rads", "Unicode_Radical_Stroke"),
    TableSpec::required(b"inmc", "Indic_Matra_Category"),
    TableSpec::required(b"insc", "Indic_Syllabic_Category"),
    TableSpec::required(b"prmc", "Primary_Composite"),
    // PropList
    TableSpec::required(b"AHD?", "ASCII_Hex_Digit"),
    TableSpec::required(b"BCt?", "Bidi_Control"),
    TableSpec::required(b"Dsh?", "Dash"),
    TableSpec::required(b"Dep?", "Deprecated"),
    TableSpec::required(b"Dia?", "Diacritic"),
    TableSpec::required(b"Ext?", "Extender"),
    TableSpec::required(b"Hex?", "Hex_Digit"),
    TableSpec::required(b"Hyp?", "Hyphen"),
    TableSpec::required(b"Ido?", "Ideographic"),
    TableSpec::required(b"IBO?", "IDS_Binary_Operator"),
    TableSpec::required(b"ITO?", "IDS_Trinary_Operator"),
    TableSpec::required(b"JCt?", "Join_Control"),
    TableSpec::required(b"LOE?", "Logical_Order_Exception"),
    TableSpec::required(b"NCP?", "Noncharacter_Code_Point"),
    TableSpec::required(b"OAl?", "Other_Alphabetic"),
    TableSpec::required(b"ODI?", "Other_Default_Ignorable_Code_Point"),
    TableSpec::required(b"OGE?", "Other_Grapheme_Extend"),
    TableSpec::required(b"OIC?", "Other_ID_Continue"),
    TableSpec::required(b"OIS?", "Other_ID_Start"),
    TableSpec::required(b"OLc?", "Other_Lowercase"),
    TableSpec::required(b"OMa?", "Other_Math"),
    TableSpec::required(b"OUc?", "Other_Uppercase"),
    TableSpec::required(b"PSy?", "Pattern_Syntax"),
    TableSpec::required(b"PWS?", "Pattern_White_Space"),
    TableSpec::required(b"QMa?", "Quotation_Mark"),
    TableSpec::required(b"Rad?", "Radical"),
    TableSpec::required(b"SDt?", "Soft_Dotted"),
    TableSpec::required(b"Stm?", "Sentence_Terminal").with_aliases(&["STerm"]),
    TableSpec::required(b"TPu?", "Terminal_Punctuation"),
    TableSpec::required(b"UId?", "Unified_Ideograph"),
    TableSpec::required(b"VSl?", "Variation_Selector"),
    TableSpec::required(b"WSp?", "White_Space"),
    // DerivedCoreProperties
    TableSpec::required(b"Lca?", "Lowercase"),
    TableSpec::required(b"Uca?", "Uppercase"),
    TableSpec::required(b"Cse?", "Cased"),
    TableSpec::required(b"CIg?", "Case_Ignorable"),
    TableSpec::required(b"CWL?", "Changes_When_Lowercased"),
    TableSpec::required(b"CWU?", "Changes_When_Uppercased"),
    TableSpec::required(b"CWT?", "Changes_When_Titlecased"),
    TableSpec::required(b"CWC?", "Changes_When_Casefolded"),
    TableSpec::required(b"CWM?", "Changes_When_Casemapped"),
    TableSpec::required(b"Alp?", "Alphabetic"),
    TableSpec::required(b"DIC?", "Default_Ignorable_Code_Point"),
    TableSpec::required(b"GBa?", "Grapheme_Base"),
    TableSpec::required(b"GEx?", "Grapheme_Extend"),
    TableSpec::required(b"GLi?", "Grapheme_Link"),
    TableSpec::required(b"Mth?", "Math"),
    TableSpec::required(b"IDS?", "ID_Start"),
    TableSpec::required(b"IDC?", "ID_Continue"),
    TableSpec::required(b"XID?", "XID_Start"),
    TableSpec::required(b"XIC?", "XID_Continue"),
    // CompositionExclusions
    TableSpec::required(b"CEx?", "Composition_Exclusion"),
    // DerivedNormalizationProps
    TableSpec::required(b"FCx?", "Full_Composition_Exclusion"),
    TableSpec::required(b"xND?", "Expands_On_NFD"),
    TableSpec::required(b"xNC?", "Expands_On_NFC"),
    TableSpec::required(b"xNd?", "Expands_On_NFKD"),
    TableSpec::required(b"xNc?", "Expands_On_NFKC"),
    TableSpec::required(b"CWc?", "Changes_When_NFKC_Casefolded"),
    // emoji data
    TableSpec::optional(b"Emj?", "Emoji"),
    TableSpec::optional(b"EmP?", "Emoji_Presentation"),
    TableSpec::optional(b"EmM?", "Emoji_Modifier"),
    TableSpec::optional(b"EmB?", "Emoji_Modifier_Base"),
];

/// Everything the assembler needs to know about a build, besides the data.
///
/// The orchestrator constructs one of these and passes it by reference to
/// [`UcdBuilder::build`][crate::UcdBuilder::build].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildContext {
    unicode_version: UnicodeVersion,
    emoji_version: Option<UnicodeVersion>,
    tables: Vec<TableSpec>,
}

impl BuildContext {
    /// A context for a build with the standard set of tables.
    pub fn new(unicode_version: UnicodeVersion) -> Self {
        BuildContext {
            unicode_version,
            emoji_version: None,
            tables: STANDARD_TABLES.to_vec(),
        }
    }

    /// A context with a custom table registry.
    pub fn with_tables(
        unicode_version: UnicodeVersion,
        tables: impl IntoIterator<Item = TableSpec>,
    ) -> Self {
        BuildContext {
            unicode_version,
            emoji_version: None,
            tables: tables.into_iter().collect(),
        }
    }

    /// Set the version of the emoji data, if any was used.
    pub fn set_emoji_version(&mut self, version: Option<UnicodeVersion>) -> &mut Self {
        self.emoji_version = version;
        self
    }

    /// The version of the Unicode Character Database.
    pub fn unicode_version(&self) -> UnicodeVersion {
        self.unicode_version
    }

    /// The version of the emoji data, if any.
    pub fn emoji_version(&self) -> Option<UnicodeVersion> {
        self.emoji_version
    }

    /// The registered tables, in directory order.
    pub fn tables(&self) -> &[TableSpec] {
        &self.tables
    }

    /// Look up the table for a property name, or one of its aliases.
    pub fn table_for_property(&self, name: &str) -> Option<&TableSpec> {
        self.tables.iter().find(|spec| spec.matches(name))
    }

    /// Look up the registry entry for `tag`.
    pub fn table_for_tag(&self, tag: Tag) -> Option<&TableSpec> {
        self.tables.iter().find(|spec| spec.tag == tag)
    }
}

impl Validate for BuildContext {
    fn validate_impl(&self, ctx: &mut ValidationCtx) {
        ctx.in_table("BuildContext", |ctx| {
            ctx.in_field("unicode_version", |ctx| ctx.check_version(self.unicode_version));
            if let Some(version) = self.emoji_version {
                ctx.in_field("emoji_version", |ctx| ctx.check_version(version));
            }
            ctx.in_field("tables", |ctx| {
                ctx.in_array(|ctx| {
                    for (i, spec) in self.tables.iter().enumerate() {
                        ctx.array_item(|ctx| {
                            ctx.check_tag(spec.tag);
                            if self.tables[..i].iter().any(|prev| prev.tag == spec.tag) {
                                ctx.report(format_args!("duplicate table '{}'", spec.tag));
                            }
                        })
                    }
                })
            });
        })
    }
}
