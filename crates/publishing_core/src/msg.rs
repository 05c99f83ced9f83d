#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardMsg {
    /// User asked to jump to a specific step (step indicator click).
    NavigateTo(crate::WizardStep),
    /// User clicked Next.
    Next,
    /// User clicked Previous.
    Previous,
    /// Router reports the route now shown in the address bar.
    RouteChanged(crate::WizardRoute),
    /// Confirm step reports whether every checklist item is ticked.
    ConfirmationsChanged(bool),
    /// User clicked Publish.
    PublishClicked,
    /// Backend answered the publish request.
    PublishFinished(Result<(), String>),
    /// User clicked Save Draft.
    SaveDraftClicked,
    /// Backend answered the draft save request.
    SaveDraftFinished(Result<(), String>),
    /// User closed the alert banner.
    AlertDismissed,
}
