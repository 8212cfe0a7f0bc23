use crate::error::{FieldIssue, ValidationError};
use crate::model::{FieldId, OrbitParameters};
use crate::orbit;
use crate::plot::Figure;

#[derive(Clone, Debug)]
pub(crate) struct Field {
    pub(crate) id: FieldId,
    pub(crate) text: String,
    /// Cursor position in chars, `0..=text.chars().count()`.
    pub(crate) cursor: usize,
}

impl Field {
    fn new(id: FieldId) -> Self {
        let text = id.default_text().to_string();
        let cursor = text.chars().count();
        Self { id, text, cursor }
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_at(&self, ci: usize) -> usize {
        self.text
            .char_indices()
            .nth(ci)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    fn insert(&mut self, ch: char) {
        let b = self.byte_at(self.cursor);
        self.text.insert(b, ch);
        self.cursor += 1;
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let b = self.byte_at(self.cursor);
        self.text.remove(b);
    }

    fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let b = self.byte_at(self.cursor);
            self.text.remove(b);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Focus {
    Field(FieldId),
    Submit,
}

/// Editing operations on the focused field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Edit {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

/// The live parameter form: five text fields plus the submit button.
#[derive(Clone, Debug)]
pub(crate) struct Form {
    fields: Vec<Field>,
    focus: Focus,
}

impl Default for Form {
    fn default() -> Self {
        Self {
            fields: FieldId::ALL.iter().copied().map(Field::new).collect(),
            focus: Focus::Field(FieldId::Au),
        }
    }
}

impl Form {
    pub(crate) fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub(crate) fn focus(&self) -> Focus {
        self.focus
    }

    fn focus_slot(&self) -> usize {
        match self.focus {
            Focus::Field(id) => id.index(),
            Focus::Submit => FieldId::ALL.len(),
        }
    }

    fn set_focus_slot(&mut self, slot: usize) {
        self.focus = match FieldId::ALL.get(slot) {
            Some(&id) => Focus::Field(id),
            None => Focus::Submit,
        };
    }

    pub(crate) fn focus_next(&mut self) {
        let n = FieldId::ALL.len() + 1;
        self.set_focus_slot((self.focus_slot() + 1) % n);
    }

    pub(crate) fn focus_prev(&mut self) {
        let n = FieldId::ALL.len() + 1;
        self.set_focus_slot((self.focus_slot() + n - 1) % n);
    }

    pub(crate) fn edit(&mut self, e: Edit) {
        let Focus::Field(id) = self.focus else {
            return;
        };
        let f = &mut self.fields[id.index()];
        match e {
            Edit::Insert(ch) => f.insert(ch),
            Edit::Backspace => f.backspace(),
            Edit::Delete => f.delete(),
            Edit::Left => f.cursor = f.cursor.saturating_sub(1),
            Edit::Right => f.cursor = (f.cursor + 1).min(f.char_len()),
            Edit::Home => f.cursor = 0,
            Edit::End => f.cursor = f.char_len(),
        }
    }

    /// Copies the current field texts; the submit handler works on this copy only.
    pub(crate) fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            values: std::array::from_fn(|i| self.fields[i].text.clone()),
        }
    }
}

/// Raw field texts captured when the user submits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FormSnapshot {
    values: [String; 5],
}

impl FormSnapshot {
    pub(crate) fn text(&self, id: FieldId) -> &str {
        &self.values[id.index()]
    }

    #[cfg(test)]
    pub(crate) fn with(mut self, id: FieldId, text: &str) -> Self {
        self.values[id.index()] = text.to_string();
        self
    }
}

/// Drops `_` digit separators that sit between two digits (`149_600_000`).
/// Any other underscore is kept so the parse fails on it.
fn strip_digit_separators(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter(|&(i, &c)| {
            let between_digits = i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
            !(c == '_' && between_digits)
        })
        .map(|(_, &c)| c)
        .collect()
}

fn parse_field(id: FieldId, text: &str) -> Result<f64, FieldIssue> {
    let cleaned = strip_digit_separators(text.trim());
    let v: f64 = cleaned.parse().map_err(|_| FieldIssue::Unparseable {
        field: id,
        text: text.to_string(),
    })?;
    if !v.is_finite() {
        return Err(FieldIssue::NotFinite { field: id });
    }
    if v <= 0.0 {
        return Err(FieldIssue::NotPositive { field: id, value: v });
    }
    Ok(v)
}

/// Checks every field and builds the parameters, or reports all bad fields at once.
pub(crate) fn validate(snapshot: &FormSnapshot) -> Result<OrbitParameters, ValidationError> {
    let mut values = [0.0f64; 5];
    let mut issues = Vec::new();
    for id in FieldId::ALL {
        match parse_field(id, snapshot.text(id)) {
            Ok(v) => values[id.index()] = v,
            Err(issue) => issues.push(issue),
        }
    }
    if !issues.is_empty() {
        return Err(ValidationError { issues });
    }
    Ok(OrbitParameters {
        sun_earth_distance: values[FieldId::Au.index()],
        earth_moon_distance: values[FieldId::EmDist.index()],
        year_length_days: values[FieldId::Year.index()],
        month_length_days: values[FieldId::Month.index()],
        moon_scale_factor: values[FieldId::Scale.index()],
    })
}

/// Submit action: validate the snapshot, then run the trajectory generator.
///
/// The generator is not invoked when validation fails.
pub(crate) fn submit(snapshot: FormSnapshot, sample_count: usize) -> Result<Figure, ValidationError> {
    let params = match validate(&snapshot) {
        Ok(p) => p,
        Err(e) => {
            let bad: Vec<&str> = e.fields().map(FieldId::key).collect();
            tracing::warn!(fields = ?bad, "rejected form submission");
            return Err(e);
        }
    };
    tracing::info!(?params, samples = sample_count, "form submitted");
    let trajectory = orbit::generate(&params, sample_count);
    Ok(orbit::figure(&params, trajectory))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let p = validate(&Form::default().snapshot()).unwrap();
        assert_eq!(
            p,
            OrbitParameters {
                sun_earth_distance: 149_600_000.0,
                earth_moon_distance: 384_400.0,
                year_length_days: 365.25,
                month_length_days: 27.32,
                moon_scale_factor: 50.0,
            }
        );
    }

    #[test]
    fn non_numeric_field_is_rejected_without_generating() {
        let snap = Form::default().snapshot().with(FieldId::Au, "abc");
        let err = submit(snap, 10_000).unwrap_err();
        assert_eq!(
            err.issues,
            vec![FieldIssue::Unparseable {
                field: FieldId::Au,
                text: "abc".into()
            }]
        );
    }

    #[test]
    fn every_bad_field_is_reported() {
        let snap = Form::default()
            .snapshot()
            .with(FieldId::Year, "")
            .with(FieldId::Month, "0")
            .with(FieldId::Scale, "-2");
        let err = validate(&snap).unwrap_err();
        assert_eq!(
            err.fields().collect::<Vec<_>>(),
            vec![FieldId::Year, FieldId::Month, FieldId::Scale]
        );
        assert!(matches!(
            err.issues[2],
            FieldIssue::NotPositive { value, .. } if value == -2.0
        ));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        for text in ["nan", "inf", "-infinity"] {
            let snap = Form::default().snapshot().with(FieldId::EmDist, text);
            assert!(validate(&snap).is_err(), "{text} accepted");
        }
        let snap = Form::default().snapshot().with(FieldId::EmDist, "NaN");
        assert_eq!(
            validate(&snap).unwrap_err().issues,
            vec![FieldIssue::NotFinite {
                field: FieldId::EmDist
            }]
        );
    }

    #[test]
    fn surrounding_whitespace_and_exponents_parse() {
        let snap = Form::default()
            .snapshot()
            .with(FieldId::Au, "  1.496e8 ")
            .with(FieldId::Scale, "+1");
        let p = validate(&snap).unwrap();
        assert_eq!(p.sun_earth_distance, 1.496e8);
        assert_eq!(p.moon_scale_factor, 1.0);
    }

    #[test]
    fn underscores_between_digits_are_separators() {
        assert_eq!(parse_field(FieldId::Au, "149_600_000"), Ok(149_600_000.0));
        assert_eq!(parse_field(FieldId::Year, "3_65.2_5"), Ok(365.25));
        for bad in ["_1", "1_", "1__0", "1_.5"] {
            assert!(
                matches!(parse_field(FieldId::Au, bad), Err(FieldIssue::Unparseable { .. })),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn submit_returns_full_figure() {
        let fig = submit(Form::default().snapshot(), 10_000).unwrap();
        assert_eq!(fig.series.len(), 3);
        assert_eq!(fig.series[1].points.len(), 10_000);
        assert_eq!(fig.series[2].points.len(), 10_000);
    }

    #[test]
    fn focus_cycles_through_fields_and_button() {
        let mut form = Form::default();
        assert_eq!(form.focus(), Focus::Field(FieldId::Au));
        for _ in 0..5 {
            form.focus_next();
        }
        assert_eq!(form.focus(), Focus::Submit);
        form.focus_next();
        assert_eq!(form.focus(), Focus::Field(FieldId::Au));
        form.focus_prev();
        assert_eq!(form.focus(), Focus::Submit);
        form.focus_prev();
        assert_eq!(form.focus(), Focus::Field(FieldId::Scale));
    }

    #[test]
    fn editing_the_focused_field() {
        let mut form = Form::default();
        form.focus_next(); // EM_DIST = "384400", cursor at end
        form.edit(Edit::Backspace);
        form.edit(Edit::Backspace);
        form.edit(Edit::Home);
        form.edit(Edit::Delete);
        form.edit(Edit::Insert('9'));
        form.edit(Edit::Right);
        form.edit(Edit::Insert('.'));
        form.edit(Edit::End);
        form.edit(Edit::Insert('5'));
        assert_eq!(form.snapshot().text(FieldId::EmDist), "98.445");
        // other fields untouched
        assert_eq!(form.snapshot().text(FieldId::Au), "149600000");
    }

    #[test]
    fn edits_on_the_button_are_ignored() {
        let mut form = Form::default();
        form.focus_prev();
        assert_eq!(form.focus(), Focus::Submit);
        let before = form.snapshot();
        form.edit(Edit::Insert('x'));
        form.edit(Edit::Backspace);
        assert_eq!(form.snapshot(), before);
    }

    #[test]
    fn cursor_handles_multibyte_text() {
        let mut form = Form::default();
        form.edit(Edit::Insert('é'));
        form.edit(Edit::Left);
        form.edit(Edit::Insert('ß'));
        form.edit(Edit::Right);
        form.edit(Edit::Backspace);
        assert_eq!(form.snapshot().text(FieldId::Au), "149600000ß");
        assert_eq!(form.fields()[0].cursor, 10);
    }
}
