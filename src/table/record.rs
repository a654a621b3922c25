use chrono::{Datelike, NaiveDate, Weekday};

/// Count columns carried by every call record, in source-sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountField {
    TotalDials,
    Conversations,
    Leads,
    OffersMade,
    TotalCorrectNumbers,
    DeadNumbers,
    CorrectInitialCall,
    CorrectFollowUp1,
    CorrectFollowUp2,
    CorrectFollowUp3,
    NotInterested,
    WrongNumber,
    OffersSigned,
    ContractsSigned,
}

impl CountField {
    pub const COUNT: usize = 14;

    pub const ALL: [CountField; CountField::COUNT] = [
        CountField::TotalDials,
        CountField::Conversations,
        CountField::Leads,
        CountField::OffersMade,
        CountField::TotalCorrectNumbers,
        CountField::DeadNumbers,
        CountField::CorrectInitialCall,
        CountField::CorrectFollowUp1,
        CountField::CorrectFollowUp2,
        CountField::CorrectFollowUp3,
        CountField::NotInterested,
        CountField::WrongNumber,
        CountField::OffersSigned,
        CountField::ContractsSigned,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            CountField::TotalDials => "total_dials",
            CountField::Conversations => "conversations",
            CountField::Leads => "leads",
            CountField::OffersMade => "offers_made",
            CountField::TotalCorrectNumbers => "total_correct_numbers",
            CountField::DeadNumbers => "dead_numbers",
            CountField::CorrectInitialCall => "correct_initial_call",
            CountField::CorrectFollowUp1 => "correct_follow_up_1",
            CountField::CorrectFollowUp2 => "correct_follow_up_2",
            CountField::CorrectFollowUp3 => "correct_follow_up_3",
            CountField::NotInterested => "not_interested",
            CountField::WrongNumber => "wrong_number",
            CountField::OffersSigned => "offers_signed",
            CountField::ContractsSigned => "contracts_signed",
        }
    }
}

/// One value per [`CountField`], indexed by [`CountField::index`]. `None` is a malformed or empty cell.
pub type Counts = [Option<f64>; CountField::COUNT];

/// Per-row performance ratios. `None` whenever the denominator is zero or missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ratios {
    pub connection_rate: Option<f64>,
    pub offers_per_convo: Option<f64>,
    pub acceptance_rate: Option<f64>,
    pub contract_rate: Option<f64>,
    pub success_rate: Option<f64>,
}

impl Ratios {
    pub fn from_counts(counts: &Counts) -> Self {
        let get = |field: CountField| counts[field.index()];

        let dials = get(CountField::TotalDials);
        let conversations = get(CountField::Conversations);
        let offers = get(CountField::OffersMade);
        let signed = get(CountField::OffersSigned);
        let contracts = get(CountField::ContractsSigned);

        Ratios {
            connection_rate: ratio(conversations, dials),
            offers_per_convo: match conversations {
                Some(c) if c > 0.0 => ratio(offers, Some(c)),
                _ => None,
            },
            acceptance_rate: ratio(signed, offers),
            contract_rate: ratio(contracts, offers),
            success_rate: ratio(contracts, dials),
        }
    }
}

fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

/// A single caller-day observation.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    date: Option<NaiveDate>,
    day_of_week: Option<Weekday>,
    caller: Option<String>,
    counts: Counts,
    ratios: Ratios,
}

impl CallRecord {
    /// Builds a record, deriving the weekday and ratios from `date` and `counts`.
    pub fn new(date: Option<NaiveDate>, caller: Option<String>, counts: Counts) -> Self {
        CallRecord {
            date,
            day_of_week: date.map(|d| d.weekday()),
            caller,
            ratios: Ratios::from_counts(&counts),
            counts,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn day_of_week(&self) -> Option<Weekday> {
        self.day_of_week
    }

    pub fn caller(&self) -> Option<&str> {
        self.caller.as_deref()
    }

    pub fn count(&self, field: CountField) -> Option<f64> {
        self.counts[field.index()]
    }

    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    pub fn ratios(&self) -> &Ratios {
        &self.ratios
    }
}

/// Full English name of a weekday, e.g. `Monday`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
