use crate::ArticleId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEffect {
    /// Push a new path onto the router history.
    PushRoute { path: String },
    /// Set the article's status to published.
    PublishArticle { article_id: ArticleId },
    /// Persist the current draft.
    SaveDraft { article_id: ArticleId },
    /// Leave the wizard for the success page.
    RedirectToSuccess { path: String },
    /// Blocking alert for the user.
    ShowAlert { message: String },
}
