use crate::models::{ReportStyle, FALLBACK_LOCATION};

/// Which template a prompt is rendered from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Wind,
    Easterly,
    Rain,
}

impl From<ReportStyle> for PromptKind {
    fn from(style: ReportStyle) -> Self {
        match style {
            ReportStyle::Wind => PromptKind::Wind,
            ReportStyle::Easterly => PromptKind::Easterly,
        }
    }
}

/// Render the summarization prompt for one cycle
pub fn build_prompt(kind: PromptKind, location: &str, analysis: &str, table: &str) -> String {
    let location = match location.trim() {
        "" => FALLBACK_LOCATION,
        name => name,
    };

    match kind {
        PromptKind::Wind => format!(
            "{location} wind forecast (km/h, direction as N/E/S/W).\n\n\
             {analysis}\n\n{table}\n\
             Summarize briefly: what is the predominant wind direction, \
             on which dates does the direction change, and which days are easterly? \
             Keep the answer short."
        ),
        PromptKind::Easterly => format!(
            "{location} wind forecast. Easterly wind = planes overhead (✈️).\n\n\
             {analysis}\n\n{table}\n\
             Summarize briefly: what is the predominant wind direction, \
             how many easterly days are there, and on which dates does the wind change direction? \
             Keep the answer short."
        ),
        PromptKind::Rain => format!(
            "{location} rain forecast for the school run. \
             AM is the drop-off window (06:00-10:00), PM is the pick-up window (15:00-18:00); \
             ☔ marks a wet morning.\n\n\
             {analysis}\n\n{table}\n\
             Summarize briefly: which days need a raincoat for drop-off or pick-up, \
             and which day is wettest? Keep the answer short."
        ),
    }
}
