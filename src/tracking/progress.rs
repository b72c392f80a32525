use crate::api::models::dates::display_date;
use crate::api::models::{Forage, Phase};
use chrono::NaiveDate;

/// Day counts shown on a well's progress card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellProgress {
    pub begin: Option<NaiveDate>,
    pub completion: Option<NaiveDate>,
    pub total_days: i64,
    pub completed_days: i64,
    pub countdown: i64,
}

impl WellProgress {
    pub fn begin_label(&self) -> String {
        display_date(self.begin)
    }

    pub fn completion_label(&self) -> String {
        display_date(self.completion)
    }
}

/// Campaign span from the forage dates, widened by the phases when the
/// forage lacks either bound
pub fn well_progress(forage: Option<&Forage>, phases: &[Phase], today: NaiveDate) -> WellProgress {
    let mut begin = forage.and_then(|f| f.date_debut);
    let mut end = forage.and_then(|f| f.date_fin);

    if begin.is_none() || end.is_none() {
        for phase in phases {
            if let Some(start) = phase.date_debut_reelle.or(phase.date_debut_prevue) {
                if begin.is_none_or(|b| start < b) {
                    begin = Some(start);
                }
            }
            if let Some(finish) = phase.date_fin_reelle.or(phase.date_fin_prevue) {
                if end.is_none_or(|e| finish > e) {
                    end = Some(finish);
                }
            }
        }
    }

    let (total_days, completed_days) = match (begin, end) {
        (Some(begin), Some(end)) => {
            let total = (end - begin).num_days();
            let completed = if begin > today {
                0
            } else if today >= end {
                total
            } else {
                (today - begin).num_days()
            };
            (total, completed)
        }
        _ => (0, 0),
    };

    WellProgress {
        begin,
        completion: end,
        total_days,
        completed_days,
        countdown: (total_days - completed_days).max(0),
    }
}
