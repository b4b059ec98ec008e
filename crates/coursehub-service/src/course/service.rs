//! Course catalog reads with access-aware lecture gating.

use std::sync::Arc;

use uuid::Uuid;

use coursehub_core::error::AppError;
use coursehub_core::result::AppResult;
use coursehub_core::types::pagination::{PageRequest, PageResponse};
use coursehub_database::repositories::CourseRepository;
use coursehub_entity::course::{Course, Lecture};

use crate::access::{AccessDecision, AccessService};

/// A course with its lecture list and the viewer's decision.
#[derive(Debug, Clone)]
pub struct CourseDetail {
    /// The course.
    pub course: Course,
    /// Lectures in display order.
    pub lectures: Vec<Lecture>,
    /// The viewer's decision; `None` for anonymous viewers.
    pub decision: Option<AccessDecision>,
}

/// Read-side course catalog used by the detail and listing pages.
#[derive(Debug, Clone)]
pub struct CourseService {
    /// Course repository.
    course_repo: Arc<CourseRepository>,
    /// Access service for the viewer's decision.
    access: Arc<AccessService>,
}

impl CourseService {
    /// Creates a new course service.
    pub fn new(course_repo: Arc<CourseRepository>, access: Arc<AccessService>) -> Self {
        Self {
            course_repo,
            access,
        }
    }

    /// List published courses.
    pub async fn list_published(&self, page: &PageRequest) -> AppResult<PageResponse<Course>> {
        self.course_repo.list_published(page).await
    }

    /// One course with lectures and the viewer's decision.
    ///
    /// The caller gates each lecture's video reference on
    /// `decision.is_granted()` or the lecture's `preview_free` flag.
    pub async fn detail(&self, viewer: Option<Uuid>, course_id: Uuid) -> AppResult<CourseDetail> {
        let course = self
            .course_repo
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found"))?;

        let lectures = self.course_repo.lectures(course_id).await?;
        let decision = match viewer {
            Some(user_id) => Some(self.access.get_decision(user_id, course_id).await?),
            None => None,
        };

        Ok(CourseDetail {
            course,
            lectures,
            decision,
        })
    }
}
