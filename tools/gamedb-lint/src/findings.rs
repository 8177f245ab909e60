//! Accumulator for validation failures across one run.
//!
//! Validators never fail for schema violations; they record a message
//! through a [`GameRecorder`], which ties it to the game being checked.

/// One recorded schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub game: String,
    pub message: String,
}

/// Append-only list of validation errors, in encounter order.
#[derive(Debug, Default)]
pub struct Findings {
    errors: Vec<ValidationError>,
}

/// Records errors on behalf of a single game.
pub struct GameRecorder<'a> {
    game: &'a str,
    errors: &'a mut Vec<ValidationError>,
    recorded: usize,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start recording errors for `game`.
    pub fn for_game<'a>(&'a mut self, game: &'a str) -> GameRecorder<'a> {
        GameRecorder {
            game,
            errors: &mut self.errors,
            recorded: 0,
        }
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Messages grouped by game, groups ordered by first appearance.
    pub fn grouped(&self) -> Vec<(&str, Vec<&str>)> {
        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
        for error in &self.errors {
            match groups.iter_mut().find(|(game, _)| *game == error.game) {
                Some((_, messages)) => messages.push(error.message.as_str()),
                None => groups.push((error.game.as_str(), vec![error.message.as_str()])),
            }
        }
        groups
    }
}

impl GameRecorder<'_> {
    pub fn record(&mut self, message: impl Into<String>) {
        self.errors.push(ValidationError {
            game: self.game.to_string(),
            message: message.into(),
        });
        self.recorded += 1;
    }

    pub fn game(&self) -> &str {
        self.game
    }

    /// Number of errors recorded through this recorder.
    pub fn recorded(&self) -> usize {
        self.recorded
    }
}
