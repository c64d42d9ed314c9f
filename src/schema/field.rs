//! Semantic fields the panel needs, with the header patterns that identify them.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SemanticField {
    Uf,
    Year,
    Population,
    Regime,
    Sex,
    Facility,
}

impl SemanticField {
    pub const ALL: [SemanticField; 6] = [
        SemanticField::Uf,
        SemanticField::Year,
        SemanticField::Population,
        SemanticField::Regime,
        SemanticField::Sex,
        SemanticField::Facility,
    ];

    /// Candidate header patterns in priority order.
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            SemanticField::Uf => &["UF", "Estado", "Unidade Federativa", "uf"],
            SemanticField::Year => &["Ano", "Year", "ano"],
            SemanticField::Population => &[
                "População Carcerária",
                "Populacao Carceraria",
                "População",
                "População total",
                "população carcerária",
                "população",
            ],
            SemanticField::Regime => &["Regime", "regime"],
            SemanticField::Sex => &["Sexo", "sexo", "Gênero", "Genero"],
            SemanticField::Facility => &[
                "Unidade Prisional",
                "Unidade",
                "Unidade prisional",
                "Unidade Prisional Nome",
                "Unidade Prisional",
            ],
        }
    }

    /// Key shown to operators in the detected-columns list.
    pub fn key(self) -> &'static str {
        match self {
            SemanticField::Uf => "UF",
            SemanticField::Year => "Ano",
            SemanticField::Population => "PopCarceraria",
            SemanticField::Regime => "Regime",
            SemanticField::Sex => "Sexo",
            SemanticField::Facility => "Unidade",
        }
    }
}

impl fmt::Display for SemanticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
