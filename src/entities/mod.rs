//! The MediPlus entity catalogue
//!
//! One record type per entity the remote API manages, each with its draft
//! (create/update payload) type and a [`Resource`] implementation wiring it
//! into the generic gateway and store. Wire field names are camelCase; ids
//! are server-assigned and immutable.
//!
//! Access policies and route spellings mirror the remote API exactly,
//! including its irregular delete segments (`DeleteDepartment`,
//! `DeleteBlog`, plain `Delete`, ...) and the operations some entities
//! simply do not have (comments cannot be updated, reservations cannot be
//! fetched one by one).

pub mod macros;

use crate::core::error::ApiResult;
use crate::core::payload::{FileAttachment, Payload};
use crate::core::resource::{AuthPolicy, Operation, Resource};
use crate::store::ResourceStore;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Image attribute of a multipart draft.
///
/// From the client's perspective the two sides are never meaningfully
/// populated at once: before submission the attribute is a transient local
/// file, after submission it is the URL the server resolved it to. Updates
/// either upload a replacement or echo the known URL back.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Local file staged for upload, sent as the `file` form field
    Upload(FileAttachment),

    /// Previously server-resolved URL, echoed back under the entity's URL
    /// field (`icon` for treatments, `imageUrl` for projects and sliders)
    Existing(String),
}

// =============================================================================
// Department
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDraft {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
}

impl Resource for Department {
    type Draft = DepartmentDraft;

    crate::resource_routes!(base: "Department", name: "department", delete_segment: "DeleteDepartment");

    fn auth(op: Operation) -> Option<AuthPolicy> {
        Some(match op {
            Operation::List => AuthPolicy::Public,
            _ => AuthPolicy::Bearer,
        })
    }

    fn encode(draft: &Self::Draft) -> ApiResult<Payload> {
        Payload::json(draft)
    }
}

// =============================================================================
// Doctor
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub opening_hours: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDraft {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub description: String,
    pub opening_hours: String,
}

impl Resource for Doctor {
    type Draft = DoctorDraft;

    crate::resource_routes!(base: "Doctor", name: "doctor", delete_segment: "DeleteDoctor");

    fn auth(op: Operation) -> Option<AuthPolicy> {
        Some(match op {
            Operation::List => AuthPolicy::Public,
            _ => AuthPolicy::Bearer,
        })
    }

    fn encode(draft: &Self::Draft) -> ApiResult<Payload> {
        Payload::json(draft)
    }
}

// =============================================================================
// Treatment
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    pub id: i64,
    pub title: String,
    /// Server-resolved icon URL
    #[serde(default)]
    pub icon: String,
    pub price: f64,
}

#[derive(Debug, Clone, Validate)]
pub struct TreatmentDraft {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub price: f64,
    pub image: ImageSource,
}

impl Resource for Treatment {
    type Draft = TreatmentDraft;

    crate::resource_routes!(base: "Treatment", name: "treatment");

    fn auth(op: Operation) -> Option<AuthPolicy> {
        Some(match op {
            Operation::List => AuthPolicy::Public,
            _ => AuthPolicy::Bearer,
        })
    }

    fn encode(draft: &Self::Draft) -> ApiResult<Payload> {
        let payload = Payload::form()
            .text("title", draft.title.clone())
            .text("price", draft.price.to_string());
        Ok(match &draft.image {
            ImageSource::Upload(file) => payload.file("file", file.clone()),
            ImageSource::Existing(url) => payload.text("icon", url.clone()),
        })
    }

    fn absorb(&self, mut incoming: Self) -> Self {
        if incoming.icon.is_empty() {
            incoming.icon = self.icon.clone();
        }
        incoming
    }
}

// =============================================================================
// Category
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
}

impl Resource for Category {
    type Draft = CategoryDraft;

    crate::resource_routes!(base: "Category", name: "category", delete_segment: "DeleteCategory");

    fn auth(op: Operation) -> Option<AuthPolicy> {
        Some(match op {
            Operation::List => AuthPolicy::Public,
            _ => AuthPolicy::Bearer,
        })
    }

    fn encode(draft: &Self::Draft) -> ApiResult<Payload> {
        Payload::json(draft)
    }
}

// =============================================================================
// Project
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub date: String,
    /// Server-resolved image URL
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Validate)]
pub struct ProjectDraft {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub content: String,
    pub date: String,
    pub image: ImageSource,
}

impl Resource for Project {
    type Draft = ProjectDraft;

    crate::resource_routes!(base: "Project", name: "project");

    fn auth(op: Operation) -> Option<AuthPolicy> {
        Some(match op {
            Operation::List | Operation::Get => AuthPolicy::Public,
            _ => AuthPolicy::Bearer,
        })
    }

    fn encode(draft: &Self::Draft) -> ApiResult<Payload> {
        let payload = Payload::form()
            .text("title", draft.title.clone())
            .text("content", draft.content.clone())
            .text("date", draft.date.clone());
        Ok(match &draft.image {
            ImageSource::Upload(file) => payload.file("file", file.clone()),
            ImageSource::Existing(url) => payload.text("imageUrl", url.clone()),
        })
    }

    fn absorb(&self, mut incoming: Self) -> Self {
        if incoming.image_url.is_none() {
            incoming.image_url = self.image_url.clone();
        }
        incoming
    }
}

// =============================================================================
// Slider
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slider {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Server-resolved image URL
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Validate)]
pub struct SliderDraft {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub content: String,
    pub image: ImageSource,
}

impl Resource for Slider {
    type Draft = SliderDraft;

    crate::resource_routes!(base: "Slider", name: "slider");

    fn auth(op: Operation) -> Option<AuthPolicy> {
        Some(match op {
            Operation::List => AuthPolicy::Public,
            _ => AuthPolicy::Bearer,
        })
    }

    fn encode(draft: &Self::Draft) -> ApiResult<Payload> {
        let payload = Payload::form()
            .text("title", draft.title.clone())
            .text("content", draft.content.clone());
        Ok(match &draft.image {
            ImageSource::Upload(file) => payload.file("file", file.clone()),
            ImageSource::Existing(url) => payload.text("imageUrl", url.clone()),
        })
    }

    fn absorb(&self, mut incoming: Self) -> Self {
        if incoming.image_url.is_none() {
            incoming.image_url = self.image_url.clone();
        }
        incoming
    }
}

// =============================================================================
// Blog
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub facebook_url: String,
    #[serde(default)]
    pub linkedin_url: String,
    pub category_id: i64,
    #[serde(default)]
    pub date: Option<String>,
    /// Server-resolved image URLs
    #[serde(default)]
    pub image_urls: Option<Vec<String>>,
    #[serde(default)]
    pub comments_count: i64,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Validate)]
pub struct BlogDraft {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
    pub facebook_url: String,
    pub linkedin_url: String,
    pub category_id: i64,
    /// Image attachments, each sent as a `files` form field
    pub files: Vec<FileAttachment>,
}

impl Resource for Blog {
    type Draft = BlogDraft;

    crate::resource_routes!(base: "Blog", name: "blog", delete_segment: "DeleteBlog");

    fn auth(op: Operation) -> Option<AuthPolicy> {
        Some(match op {
            Operation::List | Operation::Get => AuthPolicy::Public,
            _ => AuthPolicy::Bearer,
        })
    }

    fn encode(draft: &Self::Draft) -> ApiResult<Payload> {
        let mut payload = Payload::form()
            .text("title", draft.title.clone())
            .text("content", draft.content.clone())
            .text("facebookUrl", draft.facebook_url.clone())
            .text("linkedinUrl", draft.linkedin_url.clone())
            .text("categoryId", draft.category_id.to_string());
        for file in &draft.files {
            payload = payload.file("files", file.clone());
        }
        Ok(payload)
    }

    /// Update responses omit the image URLs and the comment aggregate;
    /// both keep their previously known values.
    fn absorb(&self, mut incoming: Self) -> Self {
        if incoming.image_urls.is_none() {
            incoming.image_urls = self.image_urls.clone();
        }
        if incoming.comments.is_empty() && !self.comments.is_empty() {
            incoming.comments = self.comments.clone();
            if incoming.comments_count == 0 {
                incoming.comments_count = self.comments_count;
            }
        }
        incoming
    }
}

impl Blog {
    /// Route of the recent-blogs collection endpoint
    pub fn recent_route() -> String {
        format!("{}/GetRecent", Self::base_path())
    }

    /// Route of the title/content search endpoint
    pub fn search_route(query: &str) -> String {
        format!("{}/Search/{}", Self::base_path(), query)
    }

    /// Route of the per-category collection endpoint
    pub fn by_category_route(category_id: i64) -> String {
        format!("{}/GetByCategoryId/{}", Self::base_path(), category_id)
    }
}

/// Blog-specific collection fetches; each replaces the collection the same
/// way `fetch_all` does.
impl ResourceStore<Blog> {
    pub async fn fetch_recent(&self) -> ApiResult<Vec<Blog>> {
        self.run_list(Blog::recent_route()).await
    }

    pub async fn search(&self, query: &str) -> ApiResult<Vec<Blog>> {
        self.run_list(Blog::search_route(query)).await
    }

    pub async fn fetch_by_category(&self, category_id: i64) -> ApiResult<Vec<Blog>> {
        self.run_list(Blog::by_category_route(category_id)).await
    }
}

// =============================================================================
// Comment
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub details: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub date: String,
    pub blog_id: i64,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CommentDraft {
    #[validate(length(min = 1, message = "details must not be empty"))]
    pub details: String,
    #[validate(length(min = 1, message = "first name must not be empty"))]
    pub first_name: String,
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    pub date: String,
    pub blog_id: i64,
}

impl Resource for Comment {
    type Draft = CommentDraft;

    crate::resource_routes!(base: "Comment", name: "comment", delete_segment: "DeleteComment");

    fn auth(op: Operation) -> Option<AuthPolicy> {
        match op {
            // Visitors post comments without signing in, and the remote API
            // does not guard comment deletion either.
            Operation::List | Operation::Get | Operation::Create | Operation::Delete => {
                Some(AuthPolicy::Public)
            }
            Operation::Update => None,
        }
    }

    fn encode(draft: &Self::Draft) -> ApiResult<Payload> {
        Payload::json(draft)
    }
}

// =============================================================================
// Reservation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub department_id: i64,
    pub doctor_id: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDraft {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "phone must not be empty"))]
    pub phone: String,
    pub department_id: i64,
    pub doctor_id: i64,
    pub description: String,
    pub date: String,
}

impl Resource for Reservation {
    type Draft = ReservationDraft;

    crate::resource_routes!(base: "Reservation", name: "reservation", delete_segment: "DeleteReservation");

    fn auth(op: Operation) -> Option<AuthPolicy> {
        match op {
            // Only the back office lists reservations; visitors create them
            // from the public booking form.
            Operation::List | Operation::Delete => Some(AuthPolicy::Bearer),
            Operation::Create => Some(AuthPolicy::Public),
            Operation::Get | Operation::Update => None,
        }
    }

    fn encode(draft: &Self::Draft) -> ApiResult<Payload> {
        Payload::json(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::payload::FieldValue;

    #[test]
    fn test_delete_routes_match_remote_spellings() {
        assert_eq!(Department::delete_route(4), "Department/DeleteDepartment/4");
        assert_eq!(Doctor::delete_route(4), "Doctor/DeleteDoctor/4");
        assert_eq!(Treatment::delete_route(4), "Treatment/Delete/4");
        assert_eq!(Category::delete_route(4), "Category/DeleteCategory/4");
        assert_eq!(Project::delete_route(4), "Project/Delete/4");
        assert_eq!(Slider::delete_route(4), "Slider/Delete/4");
        assert_eq!(Blog::delete_route(4), "Blog/DeleteBlog/4");
        assert_eq!(Comment::delete_route(4), "Comment/DeleteComment/4");
        assert_eq!(
            Reservation::delete_route(4),
            "Reservation/DeleteReservation/4"
        );
    }

    #[test]
    fn test_blog_extra_routes() {
        assert_eq!(Blog::recent_route(), "Blog/GetRecent");
        assert_eq!(Blog::search_route("cardio"), "Blog/Search/cardio");
        assert_eq!(Blog::by_category_route(3), "Blog/GetByCategoryId/3");
    }

    #[test]
    fn test_auth_tables() {
        assert_eq!(Department::auth(Operation::List), Some(AuthPolicy::Public));
        assert_eq!(Department::auth(Operation::Create), Some(AuthPolicy::Bearer));
        assert_eq!(Project::auth(Operation::Get), Some(AuthPolicy::Public));
        assert_eq!(Slider::auth(Operation::Get), Some(AuthPolicy::Bearer));
        assert_eq!(Comment::auth(Operation::Create), Some(AuthPolicy::Public));
        assert_eq!(Comment::auth(Operation::Update), None);
        assert_eq!(Reservation::auth(Operation::List), Some(AuthPolicy::Bearer));
        assert_eq!(Reservation::auth(Operation::Create), Some(AuthPolicy::Public));
        assert_eq!(Reservation::auth(Operation::Get), None);
    }

    #[test]
    fn test_treatment_encode_with_upload() {
        let draft = TreatmentDraft {
            title: "Dental cleaning".to_string(),
            price: 120.0,
            image: ImageSource::Upload(FileAttachment::new("icon.png", "image/png", vec![1])),
        };
        let Payload::Multipart(fields) = Treatment::encode(&draft).unwrap() else {
            panic!("expected multipart");
        };
        assert_eq!(fields[0].name, "title");
        assert_eq!(fields[1].name, "price");
        assert_eq!(fields[1].value, FieldValue::Text("120".to_string()));
        assert_eq!(fields[2].name, "file");
    }

    #[test]
    fn test_treatment_encode_with_existing_icon() {
        let draft = TreatmentDraft {
            title: "Dental cleaning".to_string(),
            price: 120.0,
            image: ImageSource::Existing("/uploads/icon.png".to_string()),
        };
        let Payload::Multipart(fields) = Treatment::encode(&draft).unwrap() else {
            panic!("expected multipart");
        };
        assert_eq!(fields[2].name, "icon");
        assert_eq!(
            fields[2].value,
            FieldValue::Text("/uploads/icon.png".to_string())
        );
    }

    #[test]
    fn test_blog_encode_appends_each_file() {
        let draft = BlogDraft {
            title: "Open day".to_string(),
            content: "Visit us".to_string(),
            facebook_url: String::new(),
            linkedin_url: String::new(),
            category_id: 2,
            files: vec![
                FileAttachment::new("a.jpg", "image/jpeg", vec![1]),
                FileAttachment::new("b.jpg", "image/jpeg", vec![2]),
            ],
        };
        let Payload::Multipart(fields) = Blog::encode(&draft).unwrap() else {
            panic!("expected multipart");
        };
        let file_fields: Vec<_> = fields.iter().filter(|f| f.name == "files").collect();
        assert_eq!(file_fields.len(), 2);
        assert!(fields.iter().any(|f| f.name == "categoryId"));
    }

    #[test]
    fn test_blog_absorb_preserves_image_urls() {
        let known = Blog {
            id: 2,
            title: "Old".to_string(),
            content: "body".to_string(),
            facebook_url: String::new(),
            linkedin_url: String::new(),
            category_id: 1,
            date: None,
            image_urls: Some(vec!["/uploads/cover.jpg".to_string()]),
            comments_count: 3,
            comments: vec![],
        };
        let response = Blog {
            title: "New".to_string(),
            image_urls: None,
            comments_count: 0,
            ..known.clone()
        };
        let merged = known.absorb(response);
        assert_eq!(merged.title, "New");
        assert_eq!(
            merged.image_urls,
            Some(vec!["/uploads/cover.jpg".to_string()])
        );
    }

    #[test]
    fn test_slider_absorb_keeps_known_url() {
        let known = Slider {
            id: 1,
            title: "Welcome".to_string(),
            content: String::new(),
            image_url: Some("/uploads/slide.jpg".to_string()),
        };
        let merged = known.absorb(Slider {
            title: "Hello".to_string(),
            image_url: None,
            ..known.clone()
        });
        assert_eq!(merged.title, "Hello");
        assert_eq!(merged.image_url, Some("/uploads/slide.jpg".to_string()));

        // A resolved URL in the response always wins
        let replaced = known.absorb(Slider {
            id: 1,
            title: "Hello".to_string(),
            content: String::new(),
            image_url: Some("/uploads/new.jpg".to_string()),
        });
        assert_eq!(replaced.image_url, Some("/uploads/new.jpg".to_string()));
    }

    #[test]
    fn test_blog_decodes_camel_case_wire_shape() {
        let blog: Blog = serde_json::from_str(
            r#"{
                "id": 7,
                "title": "Open day",
                "content": "Visit us",
                "facebookUrl": "https://fb.example/x",
                "linkedinUrl": "",
                "categoryId": 2,
                "imageUrls": ["/uploads/a.jpg"],
                "commentsCount": 1,
                "comments": [{
                    "id": 11,
                    "details": "great",
                    "firstName": "Ali",
                    "lastName": "Hassan",
                    "email": "ali@example.test",
                    "date": "2024-05-01",
                    "blogId": 7
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(blog.category_id, 2);
        assert_eq!(blog.comments.len(), 1);
        assert_eq!(blog.comments[0].first_name, "Ali");
        assert_eq!(blog.image_urls.as_deref(), Some(&["/uploads/a.jpg".to_string()][..]));
    }
}
