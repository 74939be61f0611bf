//! Quiz catalogue spanning user-authored quizzes and the static seed set.
//!
//! User-authored quizzes always come first; likes are toggled in whichever
//! collection holds the quiz, and only that collection is rewritten.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use rand::Rng;
use tracing::info;

use crate::domain::likes::toggle_membership;
use crate::domain::ports::{
    CollectionRepository, QuizCatalogueCommand, QuizCatalogueQuery, Versioned,
};
use crate::domain::{Error, Quiz, QuizDraft, QuizId, UserId};

const ID_SUFFIX_LEN: usize = 7;
const RADIX: u32 = 36;

/// `test_<epoch millis>_<7 base-36 chars>`.
fn quiz_id(now: DateTime<Utc>) -> QuizId {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .filter_map(|_| char::from_digit(rng.gen_range(0..RADIX), RADIX))
        .collect();
    QuizId::new(format!("test_{}_{suffix}", now.timestamp_millis()))
}

/// Service over the `userTests` (`authored`) and `tests` (`seed`) collections.
#[derive(Clone)]
pub struct QuizCatalogueService<A, S> {
    authored: Arc<A>,
    seed: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<A, S> QuizCatalogueService<A, S> {
    pub fn new(authored: Arc<A>, seed: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            authored,
            seed,
            clock,
        }
    }
}

async fn toggle_in<R>(repo: &R, id: &QuizId, user: &UserId) -> Result<Option<Quiz>, Error>
where
    R: CollectionRepository<Quiz> + ?Sized,
{
    let Versioned {
        data: mut quizzes,
        version,
    } = repo.load().await?;
    let Some(quiz) = quizzes.iter_mut().find(|quiz| &quiz.id == id) else {
        return Ok(None);
    };
    let liked = toggle_membership(&mut quiz.likes, user);
    let updated = quiz.clone();
    repo.save(quizzes, &version).await?;
    info!(quiz_id = %id, user_id = %user, liked, "quiz like toggled");
    Ok(Some(updated))
}

#[async_trait]
impl<A, S> QuizCatalogueQuery for QuizCatalogueService<A, S>
where
    A: CollectionRepository<Quiz>,
    S: CollectionRepository<Quiz>,
{
    async fn list_tests(&self) -> Result<Vec<Quiz>, Error> {
        let Versioned {
            data: mut quizzes, ..
        } = self.authored.load().await?;
        let Versioned { data: seed, .. } = self.seed.load().await?;
        quizzes.extend(seed);
        Ok(quizzes)
    }

    async fn list_user_tests(&self) -> Result<Vec<Quiz>, Error> {
        let Versioned { data, .. } = self.authored.load().await?;
        Ok(data)
    }
}

#[async_trait]
impl<A, S> QuizCatalogueCommand for QuizCatalogueService<A, S>
where
    A: CollectionRepository<Quiz>,
    S: CollectionRepository<Quiz>,
{
    async fn create_user_test(&self, owner: &UserId, draft: QuizDraft) -> Result<Quiz, Error> {
        let now = self.clock.utc();
        let Versioned {
            data: mut quizzes,
            version,
        } = self.authored.load().await?;
        let mut id = quiz_id(now);
        while quizzes.iter().any(|quiz| quiz.id == id) {
            id = quiz_id(now);
        }
        let quiz = draft.into_quiz(id, owner.clone(), now);
        quizzes.insert(0, quiz.clone());
        self.authored.save(quizzes, &version).await?;
        info!(quiz_id = %quiz.id, owner_id = %owner, "quiz published");
        Ok(quiz)
    }

    async fn delete_user_test(&self, id: &QuizId) -> Result<(), Error> {
        let Versioned {
            data: mut quizzes,
            version,
        } = self.authored.load().await?;
        let Some(position) = quizzes.iter().position(|quiz| &quiz.id == id) else {
            return Err(Error::not_found(format!("test {id} not found")));
        };
        quizzes.remove(position);
        self.authored.save(quizzes, &version).await?;
        info!(quiz_id = %id, "quiz deleted");
        Ok(())
    }

    async fn toggle_like(&self, id: &QuizId, user: &UserId) -> Result<Quiz, Error> {
        if let Some(quiz) = toggle_in(self.authored.as_ref(), id, user).await? {
            return Ok(quiz);
        }
        toggle_in(self.seed.as_ref(), id, user)
            .await?
            .ok_or_else(|| Error::not_found(format!("test {id} not found")))
    }
}
