//! Transient dialog boxes built on ordinary windows.
//!
//! [`WindowManager::show_dialog`] returns a [`DialogHandle`] future that resolves once the user
//! answers: OK yields [`DialogResult::Confirmed`] (carrying the field value for prompts), Cancel
//! or Escape yields [`DialogResult::Cancelled`], and closing the window any other way yields
//! [`DialogResult::Dismissed`].

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use futures::channel::oneshot;
use leptos::logging;
use platform_host::AnnouncePriority;
use serde::{Deserialize, Serialize};

use crate::{
    effects::RuntimeEffect,
    model::{CreateWindowRequest, WindowContent, WindowDimensions, WindowId, WINDOW_TYPE_DIALOG},
    window_manager::WindowManager,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogKind {
    Info,
    Error,
    Confirmation,
    Prompt,
}

impl DialogKind {
    fn default_title(self) -> &'static str {
        match self {
            Self::Info => "Information",
            Self::Error => "Error",
            Self::Confirmation => "Confirm",
            Self::Prompt => "Input",
        }
    }

    fn buttons(self) -> Vec<DialogButton> {
        match self {
            Self::Info | Self::Error => vec![DialogButton::Ok],
            Self::Confirmation | Self::Prompt => vec![DialogButton::Ok, DialogButton::Cancel],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogButton {
    Ok,
    Cancel,
}

/// Keys a prompt dialog reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKey {
    Enter,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResult {
    /// OK pressed. Prompts carry the text field value.
    Confirmed(Option<String>),
    Cancelled,
    /// The dialog window closed without a button press.
    Dismissed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogOptions {
    /// Window title; defaults to one derived from the dialog kind.
    pub title: Option<String>,
    /// Initial prompt field value.
    pub default_value: Option<String>,
    /// Window the dialog was opened for.
    pub parent: Option<WindowId>,
}

/// Dialog body handed to the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogContent {
    pub message: String,
    pub kind: DialogKind,
    pub buttons: Vec<DialogButton>,
    /// Pre-filled, auto-selected text field. Prompts only.
    pub input: Option<String>,
}

#[derive(Debug)]
pub(crate) struct PendingDialog {
    kind: DialogKind,
    input: Option<String>,
    sender: Option<oneshot::Sender<DialogResult>>,
}

impl PendingDialog {
    pub(crate) fn resolve(mut self, result: DialogResult) {
        if let Some(sender) = self.sender.take() {
            // The caller may have dropped its handle.
            let _ = sender.send(result);
        }
    }
}

/// Future resolving to the answer of one dialog.
#[derive(Debug)]
pub struct DialogHandle {
    window_id: WindowId,
    receiver: oneshot::Receiver<DialogResult>,
}

impl DialogHandle {
    pub fn window_id(&self) -> &WindowId {
        &self.window_id
    }

    /// Returns the result without waiting, or `None` while the dialog is still open.
    pub fn try_result(&mut self) -> Option<DialogResult> {
        match self.receiver.try_recv() {
            Ok(result) => result,
            Err(oneshot::Canceled) => Some(DialogResult::Dismissed),
        }
    }
}

impl Future for DialogHandle {
    type Output = DialogResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| result.unwrap_or(DialogResult::Dismissed))
    }
}

impl WindowManager {
    /// Opens a dialog window above every other window.
    ///
    /// Error dialogs also queue the error sound and announce assertively; other kinds announce
    /// politely.
    pub fn show_dialog(
        &mut self,
        message: impl Into<String>,
        kind: DialogKind,
        options: DialogOptions,
    ) -> DialogHandle {
        let message = message.into();
        let title = options
            .title
            .unwrap_or_else(|| kind.default_title().to_string());
        let input = (kind == DialogKind::Prompt).then(|| options.default_value.unwrap_or_default());

        let content = DialogContent {
            message: message.clone(),
            kind,
            buttons: kind.buttons(),
            input: input.clone(),
        };
        let mut request = CreateWindowRequest::new(title, WindowContent::Dialog(content));
        request.dimensions = WindowDimensions::Integer {
            width: self.config.dialog_width,
            height: self.config.dialog_height,
        };
        request.window_type = WINDOW_TYPE_DIALOG.to_string();
        request.parent_window = options.parent;

        let window_id = self.create_window(request);
        let (sender, receiver) = oneshot::channel();
        self.dialogs.insert(
            window_id.clone(),
            PendingDialog {
                kind,
                input,
                sender: Some(sender),
            },
        );

        if kind == DialogKind::Error {
            self.enqueue_effect(RuntimeEffect::PlaySound("error"));
            self.announcer.announce(&message, AnnouncePriority::Assertive);
        } else {
            self.announcer.announce(&message, AnnouncePriority::Polite);
        }

        DialogHandle {
            window_id,
            receiver,
        }
    }

    /// Current text of a prompt dialog's field.
    pub fn dialog_input(&self, id: &WindowId) -> Option<&str> {
        self.dialogs.get(id)?.input.as_deref()
    }

    /// Mirrors an edit of the prompt field. Returns `false` for non-prompt or unknown dialogs.
    pub fn set_dialog_input(&mut self, id: &WindowId, value: impl Into<String>) -> bool {
        match self.dialogs.get_mut(id) {
            Some(dialog) if dialog.kind == DialogKind::Prompt => {
                dialog.input = Some(value.into());
                true
            }
            _ => false,
        }
    }

    /// Handles a button press: the window closes first, then the result is delivered.
    ///
    /// Returns `false` when the dialog is unknown or does not offer `button`.
    pub fn press_dialog_button(&mut self, id: &WindowId, button: DialogButton) -> bool {
        let offered = self
            .dialogs
            .get(id)
            .is_some_and(|dialog| dialog.kind.buttons().contains(&button));
        if !offered {
            logging::debug_warn!("dialog button {button:?} ignored for window {id}");
            return false;
        }
        let Some(dialog) = self.dialogs.remove(id) else {
            return false;
        };
        self.close_window(id);

        let result = match button {
            DialogButton::Ok => DialogResult::Confirmed(dialog.input.clone()),
            DialogButton::Cancel => DialogResult::Cancelled,
        };
        dialog.resolve(result);
        true
    }

    /// Enter confirms and Escape cancels a prompt. Other dialog kinds ignore keys.
    pub fn dialog_key(&mut self, id: &WindowId, key: DialogKey) -> bool {
        let is_prompt = self
            .dialogs
            .get(id)
            .is_some_and(|dialog| dialog.kind == DialogKind::Prompt);
        if !is_prompt {
            return false;
        }
        let button = match key {
            DialogKey::Enter => DialogButton::Ok,
            DialogKey::Escape => DialogButton::Cancel,
        };
        self.press_dialog_button(id, button)
    }
}
