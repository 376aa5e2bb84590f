use anyhow::Result;

use crate::client::ArticleService;
use crate::models::{project_cards, Article, ArticleCard};

/// Bridges user intent to the remote service and keeps the in-memory list
/// consistent with it. Every mutation is followed by a full re-fetch; the
/// list held here is always the server's last returned snapshot, never a
/// locally patched one.
pub struct SyncController<S: ArticleService> {
    service: S,
    articles: Vec<Article>,
    cards: Vec<ArticleCard>,
    input: String,
}

impl<S: ArticleService> SyncController<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            articles: Vec::new(),
            cards: Vec::new(),
            input: String::new(),
        }
    }

    /// Replace the list with whatever the service returns right now. An
    /// absent payload resets it to empty. Cards are recomputed here, once
    /// per fetch, not per render.
    pub async fn refresh(&mut self) -> Result<()> {
        match self.service.fetch_all().await? {
            Some(articles) => self.articles = articles,
            None => self.articles.clear(),
        }
        self.cards = project_cards(&self.articles);
        Ok(())
    }

    /// Submit the pending input as a new article. Empty input is a silent
    /// no-op: no request, no state change. After a successful create the
    /// input is cleared whether or not the follow-up refresh succeeded.
    pub async fn submit(&mut self) -> Result<()> {
        if self.input.is_empty() {
            return Ok(());
        }

        self.service.create(&self.input).await?;
        let refreshed = self.refresh().await;
        self.input.clear();
        refreshed
    }

    pub async fn mark_done(&mut self, id: &str) -> Result<()> {
        self.service.mark_done(id).await?;
        self.refresh().await
    }

    pub async fn undo(&mut self, id: &str) -> Result<()> {
        self.service.undo(id).await?;
        self.refresh().await
    }

    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.service.delete(id).await?;
        self.refresh().await
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn cards(&self) -> &[ArticleCard] {
        &self.cards
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CardColor;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Records every issued request and replays canned list payloads.
    #[derive(Default)]
    struct RecordingService {
        requests: RefCell<Vec<String>>,
        payloads: RefCell<VecDeque<Option<Vec<Article>>>>,
    }

    impl RecordingService {
        fn with_payloads(payloads: Vec<Option<Vec<Article>>>) -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                payloads: RefCell::new(payloads.into()),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }
    }

    impl ArticleService for RecordingService {
        async fn fetch_all(&self) -> Result<Option<Vec<Article>>> {
            self.requests.borrow_mut().push("list".to_string());
            Ok(self.payloads.borrow_mut().pop_front().unwrap_or(None))
        }

        async fn create(&self, title: &str) -> Result<()> {
            self.requests.borrow_mut().push(format!("create {}", title));
            Ok(())
        }

        async fn mark_done(&self, id: &str) -> Result<()> {
            self.requests.borrow_mut().push(format!("done {}", id));
            Ok(())
        }

        async fn undo(&self, id: &str) -> Result<()> {
            self.requests.borrow_mut().push(format!("undo {}", id));
            Ok(())
        }

        async fn delete(&self, id: &str) -> Result<()> {
            self.requests.borrow_mut().push(format!("delete {}", id));
            Ok(())
        }
    }

    fn article(id: &str, title: &str, status: bool) -> Article {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            status,
        }
    }

    #[tokio::test]
    async fn initial_refresh_replaces_list_and_projects_cards() {
        let service = RecordingService::with_payloads(vec![Some(vec![article(
            "1",
            "buy milk",
            false,
        )])]);
        let mut controller = SyncController::new(service);

        controller.refresh().await.unwrap();

        assert_eq!(controller.articles(), &[article("1", "buy milk", false)]);
        let cards = controller.cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "buy milk");
        assert_eq!(cards[0].color, CardColor::Yellow);
    }

    #[tokio::test]
    async fn refresh_replaces_wholesale_not_append() {
        let service = RecordingService::with_payloads(vec![
            Some(vec![article("1", "a", false), article("2", "b", false)]),
            Some(vec![article("3", "c", true)]),
        ]);
        let mut controller = SyncController::new(service);

        controller.refresh().await.unwrap();
        assert_eq!(controller.articles().len(), 2);

        controller.refresh().await.unwrap();
        assert_eq!(controller.articles(), &[article("3", "c", true)]);
        assert_eq!(controller.cards()[0].color, CardColor::Green);
    }

    #[tokio::test]
    async fn absent_payload_resets_to_empty() {
        let service = RecordingService::with_payloads(vec![
            Some(vec![article("1", "a", false)]),
            None,
        ]);
        let mut controller = SyncController::new(service);

        controller.refresh().await.unwrap();
        assert_eq!(controller.articles().len(), 1);

        controller.refresh().await.unwrap();
        assert!(controller.articles().is_empty());
        assert!(controller.cards().is_empty());
    }

    #[tokio::test]
    async fn submit_issues_one_create_one_list_then_clears_input() {
        let service = RecordingService::with_payloads(vec![Some(vec![article(
            "1",
            "write spec",
            false,
        )])]);
        let mut controller = SyncController::new(service);
        controller.set_input("write spec");

        controller.submit().await.unwrap();

        assert_eq!(
            controller.service.requests(),
            vec!["create write spec".to_string(), "list".to_string()]
        );
        assert_eq!(controller.input(), "");
        assert_eq!(controller.articles(), &[article("1", "write spec", false)]);
    }

    #[tokio::test]
    async fn submit_with_empty_input_is_a_no_op() {
        let service = RecordingService::default();
        let mut controller = SyncController::new(service);

        controller.submit().await.unwrap();

        assert!(controller.service.requests().is_empty());
        assert!(controller.articles().is_empty());
        assert_eq!(controller.input(), "");
    }

    #[tokio::test]
    async fn mark_done_issues_one_request_then_one_list() {
        let service = RecordingService::with_payloads(vec![Some(vec![article(
            "1",
            "buy milk",
            true,
        )])]);
        let mut controller = SyncController::new(service);

        controller.mark_done("1").await.unwrap();

        assert_eq!(
            controller.service.requests(),
            vec!["done 1".to_string(), "list".to_string()]
        );
        // Server flipped the flag; the card follows the server, not a local
        // flag flip.
        assert_eq!(controller.cards()[0].color, CardColor::Green);
    }

    #[tokio::test]
    async fn undo_and_delete_each_issue_one_request_then_one_list() {
        let service = RecordingService::default();
        let mut controller = SyncController::new(service);

        controller.undo("7").await.unwrap();
        controller.delete("7").await.unwrap();

        assert_eq!(
            controller.service.requests(),
            vec![
                "undo 7".to_string(),
                "list".to_string(),
                "delete 7".to_string(),
                "list".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn input_edits_accumulate_per_keystroke() {
        let service = RecordingService::default();
        let mut controller = SyncController::new(service);

        controller.push_input('h');
        controller.push_input('i');
        controller.push_input('!');
        controller.pop_input();

        assert_eq!(controller.input(), "hi");
    }
}
