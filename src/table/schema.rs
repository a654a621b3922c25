//! Static description of the call sheet's columns.
//!
//! Each entry names the source header, what the column feeds, and what
//! happens when the header is absent from a fetched sheet.

use csv::StringRecord;

use crate::table::record::CountField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnTarget {
    Date,
    Caller,
    Count(CountField),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
    /// The sheet is unusable without this column.
    Reject,
    /// Every row gets zero for this column.
    ZeroFill,
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub header: &'static str,
    pub target: ColumnTarget,
    pub on_missing: MissingPolicy,
}

/// The sheet spells the leads column this way, usually with trailing padding.
pub const LEADS_SOURCE_HEADER: &str = "Total Deep Prospects";

pub const SCHEMA: &[ColumnSpec] = &[
    required("Date", ColumnTarget::Date),
    required("Caller", ColumnTarget::Caller),
    count("Total Dials", CountField::TotalDials),
    count("Conversations", CountField::Conversations),
    count("Leads", CountField::Leads),
    count("Offer Made", CountField::OffersMade),
    count("Total Correct Numbers", CountField::TotalCorrectNumbers),
    count("Dead Number", CountField::DeadNumbers),
    count("Correct Initial Call", CountField::CorrectInitialCall),
    count("Correct Follow Up 1", CountField::CorrectFollowUp1),
    count("Correct Follow Up 2", CountField::CorrectFollowUp2),
    count("Correct Follow Up 3", CountField::CorrectFollowUp3),
    count("Not Interested", CountField::NotInterested),
    count("Wrong Number", CountField::WrongNumber),
    count("OFFER SIGNED", CountField::OffersSigned),
    count("CONTRACT SIGNED", CountField::ContractsSigned),
];

const fn required(header: &'static str, target: ColumnTarget) -> ColumnSpec {
    ColumnSpec {
        header,
        target,
        on_missing: MissingPolicy::Reject,
    }
}

const fn count(header: &'static str, field: CountField) -> ColumnSpec {
    ColumnSpec {
        header,
        target: ColumnTarget::Count(field),
        on_missing: MissingPolicy::ZeroFill,
    }
}

/// Maps a raw header cell to the name the schema knows it by.
pub fn canonical_header(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed == LEADS_SOURCE_HEADER {
        "Leads"
    } else {
        trimmed
    }
}

/// Column positions of a fetched sheet, resolved against [`SCHEMA`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub date: usize,
    pub caller: usize,
    /// `None` marks a count column absent from the sheet.
    pub counts: [Option<usize>; CountField::COUNT],
}

impl ColumnLayout {
    /// Resolves header positions. Returns the first missing required header as the error.
    pub fn resolve(headers: &StringRecord) -> Result<Self, &'static str> {
        let position = |name: &str| headers.iter().position(|h| canonical_header(h) == name);

        let mut date = None;
        let mut caller = None;
        let mut counts = [None; CountField::COUNT];

        for spec in SCHEMA {
            let found = position(spec.header);
            if found.is_none() && spec.on_missing == MissingPolicy::Reject {
                return Err(spec.header);
            }
            match spec.target {
                ColumnTarget::Date => date = found,
                ColumnTarget::Caller => caller = found,
                ColumnTarget::Count(field) => counts[field.index()] = found,
            }
        }

        match (date, caller) {
            (Some(date), Some(caller)) => Ok(ColumnLayout {
                date,
                caller,
                counts,
            }),
            (None, _) => Err("Date"),
            (_, None) => Err("Caller"),
        }
    }

    /// Count columns that must be zero-filled because the sheet lacks them.
    pub fn synthesized(&self) -> Vec<CountField> {
        CountField::ALL
            .into_iter()
            .filter(|f| self.counts[f.index()].is_none())
            .collect()
    }
}
