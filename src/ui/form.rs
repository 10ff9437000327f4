//! Chat form state: editable fields, model selection and focus.

use usagemon_core::config::ChatSettings;
use usagemon_core::usage::ChatRequest;

/// Field of the chat form that receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    ApiKey,
    UserLabel,
    Model,
    Prompt,
}

impl FormField {
    /// Next field in tab order (wraps)
    pub fn next(self) -> Self {
        match self {
            FormField::ApiKey => FormField::UserLabel,
            FormField::UserLabel => FormField::Model,
            FormField::Model => FormField::Prompt,
            FormField::Prompt => FormField::ApiKey,
        }
    }

    /// Previous field in tab order (wraps)
    pub fn previous(self) -> Self {
        match self {
            FormField::ApiKey => FormField::Prompt,
            FormField::UserLabel => FormField::ApiKey,
            FormField::Model => FormField::UserLabel,
            FormField::Prompt => FormField::Model,
        }
    }

    /// Label shown in front of the field
    pub fn label(&self) -> &'static str {
        match self {
            FormField::ApiKey => "API key",
            FormField::UserLabel => "User",
            FormField::Model => "Model",
            FormField::Prompt => "Prompt",
        }
    }

    /// Whether the field is free text (as opposed to a selector)
    pub fn is_text(&self) -> bool {
        !matches!(self, FormField::Model)
    }
}

/// Single text buffer with a byte-offset cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    buffer: String,
    cursor: usize,
}

impl TextInput {
    /// Create an input holding `value` with the cursor at the end
    pub fn new(value: impl Into<String>) -> Self {
        let buffer = value.into();
        let cursor = buffer.len();
        Self { buffer, cursor }
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    /// Cursor position (byte offset)
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Insert a character at cursor position
    pub fn insert(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete character before cursor (backspace)
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.buffer.remove(prev);
            self.cursor = prev;
        }
    }

    /// Delete character at cursor (delete key)
    pub fn delete(&mut self) {
        if self.cursor < self.buffer.len() {
            self.buffer.remove(self.cursor);
        }
    }

    pub fn left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_boundary();
        }
    }

    pub fn right(&mut self) {
        if let Some(c) = self.buffer[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.buffer.len();
    }

    fn prev_boundary(&self) -> usize {
        self.buffer[..self.cursor]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

/// Chat form backing the dashboard's left panel
#[derive(Debug, Clone)]
pub struct ChatForm {
    pub api_key: TextInput,
    pub user_label: TextInput,
    pub prompt: TextInput,
    models: Vec<String>,
    model_index: usize,
    focus: FormField,
}

impl ChatForm {
    /// Build the form from configured defaults.
    ///
    /// Focus starts on the API key when none is configured, on the prompt
    /// otherwise.
    pub fn from_settings(settings: &ChatSettings) -> Self {
        let api_key = TextInput::new(settings.api_key.clone().unwrap_or_default());
        let focus = if api_key.is_empty() {
            FormField::ApiKey
        } else {
            FormField::Prompt
        };

        let mut models = settings.models.clone();
        if models.is_empty() {
            models.push(settings.model.clone());
        }
        let model_index = models
            .iter()
            .position(|m| m == &settings.model)
            .unwrap_or(0);

        Self {
            api_key,
            user_label: TextInput::new(settings.user_label.clone()),
            prompt: TextInput::new(settings.prompt.clone()),
            models,
            model_index,
            focus,
        }
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Text input of the focused field, if it is a text field
    pub fn focused_input_mut(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            FormField::ApiKey => Some(&mut self.api_key),
            FormField::UserLabel => Some(&mut self.user_label),
            FormField::Prompt => Some(&mut self.prompt),
            FormField::Model => None,
        }
    }

    /// Currently selected model
    pub fn model(&self) -> &str {
        &self.models[self.model_index]
    }

    pub fn next_model(&mut self) {
        self.model_index = (self.model_index + 1) % self.models.len();
    }

    pub fn previous_model(&mut self) {
        self.model_index = (self.model_index + self.models.len() - 1) % self.models.len();
    }

    /// Snapshot the form into a request; empty fields are sent as-is
    pub fn to_request(&self) -> ChatRequest {
        ChatRequest {
            api_key: self.api_key.value().to_string(),
            model: self.model().to_string(),
            user_label: self.user_label.value().to_string(),
            prompt: self.prompt.value().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_cycle() {
        let mut field = FormField::ApiKey;
        for _ in 0..4 {
            field = field.next();
        }
        assert_eq!(field, FormField::ApiKey);
        assert_eq!(FormField::ApiKey.previous(), FormField::Prompt);
        assert!(!FormField::Model.is_text());
    }

    #[test]
    fn test_text_input_editing() {
        let mut input = TextInput::new("héllo");
        input.backspace();
        assert_eq!(input.value(), "héll");

        input.home();
        input.right();
        input.right();
        assert_eq!(input.cursor(), 3); // 'h' + 2-byte 'é'
        input.backspace();
        assert_eq!(input.value(), "hll");

        input.insert('e');
        input.end();
        input.insert('o');
        assert_eq!(input.value(), "hello");

        input.home();
        input.delete();
        assert_eq!(input.value(), "ello");
        input.left();
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_form_defaults() {
        let form = ChatForm::from_settings(&ChatSettings::default());
        assert_eq!(form.focus(), FormField::ApiKey);
        assert_eq!(form.model(), "gpt-5-mini");
        assert_eq!(form.user_label.value(), "alice");
        assert_eq!(form.prompt.value(), "Say hello!");
    }

    #[test]
    fn test_configured_key_focuses_prompt() {
        let settings = ChatSettings {
            api_key: Some("sk-test".to_string()),
            model: "gpt-4o".to_string(),
            ..ChatSettings::default()
        };
        let form = ChatForm::from_settings(&settings);
        assert_eq!(form.focus(), FormField::Prompt);
        assert_eq!(form.model(), "gpt-4o");
    }

    #[test]
    fn test_model_cycle_wraps() {
        let mut form = ChatForm::from_settings(&ChatSettings::default());
        form.previous_model();
        assert_eq!(form.model(), "gpt-4o");
        form.next_model();
        form.next_model();
        assert_eq!(form.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_to_request_sends_fields_as_is() {
        let mut form = ChatForm::from_settings(&ChatSettings::default());
        form.user_label = TextInput::new("");
        let req = form.to_request();
        assert_eq!(req.api_key, "");
        assert_eq!(req.user_label, "");
        assert_eq!(req.model, "gpt-5-mini");
        assert_eq!(req.prompt, "Say hello!");
    }
}
