// Add-connection form
//
// Editable From/To/Type/Hours/Minutes fields, autocomplete against the
// zone directory, and validation of a submission into a connection the
// world can take as-is.

use super::config::{MAX_HOURS, MAX_MINUTES, MINUTE_MS};
use crate::world::{ConnectionType, Timestamp};
use crate::zones::{Zone, ZoneDirectory};
use std::rc::Rc;
use thiserror::Error;

/// Reasons a submission is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("both zone names are required")]
    EmptyZoneName,

    #[error("a duration of 0h 0m is not allowed")]
    ZeroDuration,

    #[error("unknown zone: {0}")]
    UnknownZone(String),

    #[error("a zone cannot connect to itself")]
    SameZone,
}

/// Form field with keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    From,
    To,
    Type,
    Hours,
    Minutes,
}

impl FormField {
    const ORDER: [FormField; 5] = [
        FormField::From,
        FormField::To,
        FormField::Type,
        FormField::Hours,
        FormField::Minutes,
    ];

    fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    fn previous(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn is_zone_name(self) -> bool {
        matches!(self, FormField::From | FormField::To)
    }
}

/// A submission as typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRequest {
    pub from: String,
    pub to: String,
    pub kind: ConnectionType,
    pub hours: u64,
    pub minutes: u64,
}

/// A validated submission
#[derive(Debug, Clone)]
pub struct ResolvedConnection {
    pub start: Rc<Zone>,
    pub end: Rc<Zone>,
    pub kind: ConnectionType,
    pub expires_at: Timestamp,
}

impl ConnectionRequest {
    /// Validate against the directory and compute the absolute expiry
    ///
    /// Royal connections always last their fixed duration; the typed
    /// hours and minutes are ignored for them.
    pub fn resolve(
        &self,
        directory: &ZoneDirectory,
        now: Timestamp,
    ) -> Result<ResolvedConnection, RequestError> {
        let from = self.from.trim();
        let to = self.to.trim();
        if from.is_empty() || to.is_empty() {
            return Err(RequestError::EmptyZoneName);
        }

        let (hours, minutes) = match self.kind.fixed_duration_hours() {
            Some(fixed) => (fixed, 0),
            None => (self.hours, self.minutes),
        };
        if hours == 0 && minutes == 0 {
            return Err(RequestError::ZeroDuration);
        }

        let start = directory
            .lookup(from)
            .ok_or_else(|| RequestError::UnknownZone(from.to_string()))?;
        let end = directory
            .lookup(to)
            .ok_or_else(|| RequestError::UnknownZone(to.to_string()))?;
        if start.name == end.name {
            return Err(RequestError::SameZone);
        }

        Ok(ResolvedConnection {
            start,
            end,
            kind: self.kind,
            expires_at: now + (hours * 60 + minutes) * MINUTE_MS,
        })
    }
}

/// Editable state of the add-connection form
#[derive(Debug, Clone, Default)]
pub struct ConnectionForm {
    pub from: String,
    pub to: String,
    pub kind: ConnectionType,
    pub hours: u64,
    pub minutes: u64,
    pub focus: FormField,
    /// Highlighted autocomplete entry
    pub suggestion: usize,
}

impl ConnectionForm {
    pub fn request(&self) -> ConnectionRequest {
        ConnectionRequest {
            from: self.from.clone(),
            to: self.to.clone(),
            kind: self.kind,
            hours: self.hours,
            minutes: self.minutes,
        }
    }

    /// Prefill the From field (clicking a node)
    pub fn set_from(&mut self, name: &str) {
        self.from = name.to_string();
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.next();
        self.suggestion = 0;
    }

    pub fn previous_field(&mut self) {
        self.focus = self.focus.previous();
        self.suggestion = 0;
    }

    fn focused_name_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::From => Some(&mut self.from),
            FormField::To => Some(&mut self.to),
            _ => None,
        }
    }

    pub fn focused_name(&self) -> Option<&str> {
        match self.focus {
            FormField::From => Some(&self.from),
            FormField::To => Some(&self.to),
            _ => None,
        }
    }

    /// Type a character into the focused field
    ///
    /// Name fields take any character; duration fields take digits and
    /// clamp to their maximum.
    pub fn push_char(&mut self, c: char) {
        match self.focus {
            FormField::From | FormField::To => {
                if let Some(text) = self.focused_name_mut() {
                    text.push(c);
                }
                self.suggestion = 0;
            }
            FormField::Hours => {
                if let Some(d) = c.to_digit(10) {
                    self.hours = (self.hours * 10 + u64::from(d)).min(MAX_HOURS);
                }
            }
            FormField::Minutes => {
                if let Some(d) = c.to_digit(10) {
                    self.minutes = (self.minutes * 10 + u64::from(d)).min(MAX_MINUTES);
                }
            }
            FormField::Type => match c {
                '2' => self.kind = ConnectionType::Green,
                '7' => self.kind = ConnectionType::Blue,
                'y' | 'Y' => self.kind = ConnectionType::Yellow,
                'r' | 'R' => self.kind = ConnectionType::Royal,
                _ => {}
            },
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormField::From | FormField::To => {
                if let Some(text) = self.focused_name_mut() {
                    text.pop();
                }
                self.suggestion = 0;
            }
            FormField::Hours => self.hours /= 10,
            FormField::Minutes => self.minutes /= 10,
            FormField::Type => {}
        }
    }

    /// Cycle the connection type (Left/Right on the type field)
    pub fn cycle_type(&mut self, forward: bool) {
        self.kind = if forward {
            self.kind.next()
        } else {
            self.kind.previous()
        };
    }

    /// Autocomplete entries for the focused name field
    pub fn suggestions<'a>(&self, directory: &'a ZoneDirectory) -> Vec<&'a str> {
        match self.focused_name() {
            Some(text) if !text.trim().is_empty() => directory.find_by_prefix(text.trim()),
            _ => Vec::new(),
        }
    }

    pub fn move_suggestion(&mut self, down: bool, available: usize) {
        if available == 0 {
            self.suggestion = 0;
        } else if down {
            self.suggestion = (self.suggestion + 1).min(available - 1);
        } else {
            self.suggestion = self.suggestion.saturating_sub(1);
        }
    }

    /// Replace the focused name with the highlighted suggestion
    ///
    /// Returns `false` when there is nothing to complete, or the field
    /// already holds that exact name.
    pub fn accept_suggestion(&mut self, directory: &ZoneDirectory) -> bool {
        let Some(choice) = self
            .suggestions(directory)
            .get(self.suggestion)
            .map(|s| s.to_string())
        else {
            return false;
        };

        match self.focused_name_mut() {
            Some(text) if *text != choice => {
                *text = choice;
                true
            }
            _ => false,
        }
    }

    /// Reset after a successful submission: From and type are kept
    pub fn clear_after_submit(&mut self) {
        self.to.clear();
        self.hours = 0;
        self.minutes = 0;
        self.focus = FormField::To;
        self.suggestion = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::tests::directory;

    fn request(from: &str, to: &str, kind: ConnectionType, hours: u64, minutes: u64) -> ConnectionRequest {
        ConnectionRequest {
            from: from.into(),
            to: to.into(),
            kind,
            hours,
            minutes,
        }
    }

    #[test]
    fn test_resolve_computes_expiry() {
        let dir = directory(&["Martlock", "Bridgewatch"]);
        let resolved = request("Martlock", "Bridgewatch", ConnectionType::Blue, 1, 30)
            .resolve(&dir, 1_000)
            .unwrap();
        assert_eq!(resolved.start.name, "Martlock");
        assert_eq!(resolved.end.name, "Bridgewatch");
        assert_eq!(resolved.expires_at, 1_000 + 90 * 60_000);
    }

    #[test]
    fn test_resolve_rejects_empty_names() {
        let dir = directory(&["Martlock"]);
        let err = request("", "Martlock", ConnectionType::Green, 1, 0).resolve(&dir, 0);
        assert_eq!(err.unwrap_err(), RequestError::EmptyZoneName);
        let err = request("Martlock", "  ", ConnectionType::Green, 1, 0).resolve(&dir, 0);
        assert_eq!(err.unwrap_err(), RequestError::EmptyZoneName);
    }

    #[test]
    fn test_resolve_rejects_zero_duration() {
        let dir = directory(&["Martlock", "Bridgewatch"]);
        let err = request("Martlock", "Bridgewatch", ConnectionType::Yellow, 0, 0).resolve(&dir, 0);
        assert_eq!(err.unwrap_err(), RequestError::ZeroDuration);
    }

    #[test]
    fn test_royal_forces_full_day() {
        let dir = directory(&["Martlock", "Bridgewatch"]);
        // Zero typed duration is fine for royal
        let resolved = request("Martlock", "Bridgewatch", ConnectionType::Royal, 0, 0)
            .resolve(&dir, 0)
            .unwrap();
        assert_eq!(resolved.expires_at, 24 * 60 * 60_000);

        let resolved = request("Martlock", "Bridgewatch", ConnectionType::Royal, 3, 15)
            .resolve(&dir, 0)
            .unwrap();
        assert_eq!(resolved.expires_at, 24 * 60 * 60_000);
    }

    #[test]
    fn test_resolve_rejects_unknown_and_same_zone() {
        let dir = directory(&["Martlock"]);
        let err = request("Martlock", "Atlantis", ConnectionType::Green, 1, 0).resolve(&dir, 0);
        assert_eq!(err.unwrap_err(), RequestError::UnknownZone("Atlantis".into()));
        let err = request("Martlock", "Martlock", ConnectionType::Green, 1, 0).resolve(&dir, 0);
        assert_eq!(err.unwrap_err(), RequestError::SameZone);
    }

    #[test]
    fn test_duration_fields_clamp() {
        let mut form = ConnectionForm {
            focus: FormField::Hours,
            ..Default::default()
        };
        form.push_char('9');
        form.push_char('9');
        assert_eq!(form.hours, MAX_HOURS);
        form.push_char('x');
        assert_eq!(form.hours, MAX_HOURS);
        form.backspace();
        assert_eq!(form.hours, 2);

        form.next_field();
        assert_eq!(form.focus, FormField::Minutes);
        form.push_char('4');
        form.push_char('5');
        assert_eq!(form.minutes, 45);
    }

    #[test]
    fn test_field_cycle_wraps() {
        let mut form = ConnectionForm::default();
        assert_eq!(form.focus, FormField::From);
        form.previous_field();
        assert_eq!(form.focus, FormField::Minutes);
        form.next_field();
        form.next_field();
        assert_eq!(form.focus, FormField::To);
    }

    #[test]
    fn test_autocomplete() {
        let dir = directory(&["Thetford", "Fort Sterling", "Martlock"]);
        let mut form = ConnectionForm::default();
        for c in "ford".chars() {
            form.push_char(c);
        }
        // "ford" only occurs inside Thetford
        assert_eq!(form.suggestions(&dir), vec!["Thetford"]);

        form.from = "fort".into();
        assert_eq!(form.suggestions(&dir), vec!["Fort Sterling"]);

        form.from = "t".into();
        // Thetford at 0, then the tie at 3 in catalog order
        assert_eq!(form.suggestions(&dir), vec!["Thetford", "Fort Sterling", "Martlock"]);
        form.move_suggestion(true, 3);
        assert!(form.accept_suggestion(&dir));
        assert_eq!(form.from, "Fort Sterling");
        // Already exact: nothing more to complete
        form.suggestion = 0;
        assert!(!form.accept_suggestion(&dir));
    }

    #[test]
    fn test_no_suggestions_outside_name_fields() {
        let dir = directory(&["Martlock"]);
        let mut form = ConnectionForm {
            from: "Mart".into(),
            focus: FormField::Hours,
            ..Default::default()
        };
        assert!(form.suggestions(&dir).is_empty());
        assert!(!form.accept_suggestion(&dir));
        form.focus = FormField::From;
        assert_eq!(form.suggestions(&dir), vec!["Martlock"]);
    }

    #[test]
    fn test_clear_after_submit_keeps_from_and_type() {
        let mut form = ConnectionForm {
            from: "Martlock".into(),
            to: "Bridgewatch".into(),
            kind: ConnectionType::Yellow,
            hours: 3,
            minutes: 20,
            ..Default::default()
        };
        form.clear_after_submit();
        assert_eq!(form.from, "Martlock");
        assert_eq!(form.kind, ConnectionType::Yellow);
        assert!(form.to.is_empty());
        assert_eq!((form.hours, form.minutes), (0, 0));
        assert_eq!(form.focus, FormField::To);
    }
}
