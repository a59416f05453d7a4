//! Line-based operator prompts over any reader / writer pair.

use std::io::{BufRead, Write};

use log::debug;

use crate::error::{BikeshareError, Result};
use crate::selection::{City, Day, FilterSelection, Month, Vocabulary};
use crate::stats::separator;

pub const GREETING: &str = "Hello! Let's explore some US bikeshare data!";

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Print `question` and read one line. `None` once input is exhausted.
    pub fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_lowercase()))
    }

    /// `true` only for an explicit "yes"; end of input counts as "no".
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(self.ask(question)?.as_deref() == Some("yes"))
    }

    /// Re-prompt until the answer belongs to `V`. With `optional`, a blank
    /// answer is accepted as "no filter".
    pub fn choose<V: Vocabulary>(&mut self, optional: bool) -> Result<Option<V>> {
        loop {
            let answer = self.ask(V::QUESTION)?.ok_or(BikeshareError::InputClosed)?;
            if optional && answer.is_empty() {
                return Ok(None);
            }
            if let Some(value) = V::parse(&answer) {
                return Ok(Some(value));
            }
            debug!("rejected answer {answer:?}");
            self.say(V::INVALID)?;
        }
    }

    /// Greet the operator and collect city, month and day.
    pub fn collect_filters(&mut self) -> Result<FilterSelection> {
        self.say(GREETING)?;

        let city = self
            .choose::<City>(false)?
            .ok_or(BikeshareError::InputClosed)?;
        let month = self.choose::<Month>(true)?;
        let day = self.choose::<Day>(true)?;

        self.say(&separator())?;
        Ok(FilterSelection::new(city, month, day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn transcript(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_output()).unwrap()
    }

    #[test]
    fn city_is_reprompted_until_valid() {
        let mut p = prompter("atlantis\n\nChicago\n\n\n");
        let selection = p.collect_filters().unwrap();
        assert_eq!(selection, FilterSelection::unfiltered(City::Chicago));

        let out = transcript(p);
        assert_eq!(out.matches(City::QUESTION).count(), 3);
        assert_eq!(out.matches(City::INVALID).count(), 2);
        assert!(out.starts_with(GREETING));
    }

    #[test]
    fn month_and_day_accept_values_or_blank() {
        let mut p = prompter("washington\nMarch\n\n");
        let selection = p.collect_filters().unwrap();
        assert_eq!(selection.city, City::Washington);
        assert_eq!(selection.month, Some(Month::March));
        assert_eq!(selection.day, None);

        let mut p = prompter("new york city\n\n  FRIDAY \n");
        let selection = p.collect_filters().unwrap();
        assert_eq!(selection.month, None);
        assert_eq!(selection.day, Some(Day::Friday));
    }

    #[test]
    fn invalid_month_is_reprompted() {
        let mut p = prompter("chicago\njuly\njune\nfunday\nsunday\n");
        let selection = p.collect_filters().unwrap();
        assert_eq!(selection.month, Some(Month::June));
        assert_eq!(selection.day, Some(Day::Sunday));

        let out = transcript(p);
        assert_eq!(out.matches(Month::INVALID).count(), 1);
        assert_eq!(out.matches(Day::INVALID).count(), 1);
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut p = prompter("atlantis\n");
        assert!(matches!(
            p.collect_filters(),
            Err(BikeshareError::InputClosed)
        ));
    }

    #[test]
    fn confirm_requires_yes() {
        let mut p = prompter("YES\nyep\n");
        assert!(p.confirm("? ").unwrap());
        assert!(!p.confirm("? ").unwrap());
        assert!(!p.confirm("? ").unwrap());
    }
}
