//! 项目相关的请求与响应结构

use crate::models::err::AppError;
use crate::storage::UploadedFile;
use axum::extract::Multipart;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::debug;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

/// `release` 字段的日期格式
const RELEASE_FORMAT: &str = "%Y-%m-%d";

#[derive(Deserialize, Debug, ToSchema, Serialize, Clone, PartialEq)]
pub struct ProjectInfo {
    #[schema(example = 15)]
    /// 项目ID
    pub id: i64,

    #[schema(example = "My Cool Project")]
    pub title: String,

    #[schema(example = "my-cool-project")]
    /// 由标题生成的唯一标识，用于URL
    pub slug: String,

    pub description: Option<String>,

    #[schema(example = "projects/Yq2m8Jw0pXr4dCkVb7NzT1sLhE9aGfU3oRiW6tKe.png")]
    /// 缩略图在文件存储中的相对路径
    pub thumb: Option<String>,

    #[schema(example = "2024-06-01")]
    pub release: Option<NaiveDate>,

    #[schema(example = "https://example.com")]
    pub link: Option<String>,

    pub type_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<database::ProjectInfo> for ProjectInfo {
    fn from(project: database::ProjectInfo) -> Self {
        Self {
            id: project.id,
            title: project.title,
            slug: project.slug,
            description: project.description,
            thumb: project.thumb,
            release: project.release,
            link: project.link,
            type_id: project.type_id,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// 项目分类
#[derive(Deserialize, Debug, ToSchema, Serialize, Clone, PartialEq)]
pub struct TypeInfo {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Web")]
    pub name: String,
}

impl From<database::TypeInfo> for TypeInfo {
    fn from(project_type: database::TypeInfo) -> Self {
        Self { id: project_type.id, name: project_type.name }
    }
}

/// 技术栈
#[derive(Deserialize, Debug, ToSchema, Serialize, Clone, PartialEq)]
pub struct TechnologyInfo {
    #[schema(example = 3)]
    pub id: i64,
    #[schema(example = "Rust")]
    pub name: String,
}

impl From<database::TechnologyInfo> for TechnologyInfo {
    fn from(technology: database::TechnologyInfo) -> Self {
        Self { id: technology.id, name: technology.name }
    }
}

/// 项目详情，包含分类和技术栈
#[derive(Deserialize, Debug, ToSchema, Serialize, Clone, PartialEq)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: ProjectInfo,

    #[serde(rename = "type")]
    pub project_type: Option<TypeInfo>,

    pub technologies: Vec<TechnologyInfo>,
}

/// 新建项目表单需要的选项
#[derive(Deserialize, Debug, ToSchema, Serialize, Clone, PartialEq)]
pub struct ProjectFormOptions {
    pub types: Vec<TypeInfo>,
    pub technologies: Vec<TechnologyInfo>,
}

/// 编辑项目表单：项目详情加上可选项
#[derive(Deserialize, Debug, ToSchema, Serialize, Clone, PartialEq)]
pub struct ProjectEditForm {
    pub project: ProjectDetail,
    pub types: Vec<TypeInfo>,
    pub technologies: Vec<TechnologyInfo>,
}

/// 新建/更新项目时提交的 multipart 表单
///
/// 只用于生成OpenAPI文档，实际解析见 [`ProjectUpsert::from_multipart`]
#[derive(Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct ProjectForm {
    #[schema(example = "My Cool Project")]
    /// 新建时必填
    title: Option<String>,

    /// 更新时提交空值表示清空，`link`、`type_id` 和 `release` 同理
    description: Option<String>,

    type_id: Option<i64>,

    #[schema(value_type = Option<String>, format = Binary)]
    /// 缩略图，新建时必填，必须是图片
    thumb: Option<String>,

    #[schema(value_type = Option<String>, format = Date, example = "2024-06-01")]
    release: Option<String>,

    #[schema(example = "https://example.com")]
    link: Option<String>,

    /// 可重复提交，更新时必填；提交一个空值表示清空所有技术栈
    #[serde(rename = "technologies[]")]
    technologies: Vec<i64>,
}

/// 解析后的新建/更新项目参数
///
/// 所有字段都是可选的，新建与更新的必填规则分别由
/// [`validate_for_store`](Self::validate_for_store) 和 [`validate_for_update`](Self::validate_for_update) 检查。
///
/// 可以清空的字段使用 `Option<Option<T>>`：外层 `None` 表示没有提交，
/// `Some(None)` 表示提交了空值。
#[derive(Debug, Default, Validate)]
pub struct ProjectUpsert {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    #[validate(length(max = 65535))]
    pub description: Option<Option<String>>,

    pub type_id: Option<Option<i64>>,

    pub release: Option<Option<NaiveDate>>,

    #[validate(url, length(max = 255))]
    pub link: Option<Option<String>>,

    /// `None` 表示请求中没有提交 `technologies[]`，`Some(vec![])` 表示显式清空
    pub technologies: Option<Vec<i64>>,

    pub thumb: Option<UploadedFile>,
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// 去掉首尾空白，空字符串视为空值
fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl ProjectUpsert {
    /// 从 multipart 请求体中解析参数
    ///
    /// 未知字段会被忽略；数字和日期格式错误会汇总为一个 [`AppError::ValidationFailed`]。
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();
        let mut errors = ValidationErrors::new();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            match name.as_str() {
                "title" => form.title = non_empty(field.text().await?),
                "description" => form.description = Some(non_empty(field.text().await?)),
                "link" => form.link = Some(non_empty(field.text().await?)),
                "type_id" => match non_empty(field.text().await?) {
                    None => form.type_id = Some(None),
                    Some(value) => match value.parse::<i64>() {
                        Ok(type_id) => form.type_id = Some(Some(type_id)),
                        Err(_) => errors.add("type_id", field_error("integer", "type_id must be an integer")),
                    },
                },
                "release" => match non_empty(field.text().await?) {
                    None => form.release = Some(None),
                    Some(value) => match NaiveDate::parse_from_str(&value, RELEASE_FORMAT) {
                        Ok(release) => form.release = Some(Some(release)),
                        Err(_) => errors.add("release", field_error("date", "release must be a YYYY-MM-DD date")),
                    },
                },
                "technologies[]" | "technologies" => {
                    let value = field.text().await?;
                    let technologies = form.technologies.get_or_insert_with(Vec::new);

                    if let Some(value) = non_empty(value) {
                        match value.parse::<i64>() {
                            Ok(id) if !technologies.contains(&id) => technologies.push(id),
                            Ok(_) => {}
                            Err(_) => {
                                errors.add("technologies", field_error("integer", "technologies must be integers"))
                            }
                        }
                    }
                }
                "thumb" => {
                    let file_name = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;

                    // 浏览器在没有选择文件时也会提交一个空的文件字段
                    if !bytes.is_empty() {
                        form.thumb = Some(UploadedFile { file_name, content_type, bytes });
                    }
                }
                _ => debug!("忽略未知字段: {}", name),
            }
        }

        if errors.is_empty() {
            Ok(form)
        } else {
            Err(errors.into())
        }
    }

    /// 新建项目的校验规则：`title` 和图片格式的 `thumb` 必填
    pub fn validate_for_store(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);

        if self.title.is_none() {
            errors.add("title", field_error("required", "title is required"));
        }

        match &self.thumb {
            None => errors.add("thumb", field_error("required", "thumb is required")),
            Some(thumb) if !thumb.is_image() => errors.add("thumb", field_error("image", "thumb must be an image")),
            Some(_) => {}
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// 更新项目的校验规则：`technologies` 必须提交（可以为空），`thumb` 如果提交必须是图片
    pub fn validate_for_update(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);

        if self.technologies.is_none() {
            errors.add("technologies", field_error("required", "technologies is required"));
        }

        if self.thumb.as_ref().is_some_and(|thumb| !thumb.is_image()) {
            errors.add("thumb", field_error("image", "thumb must be an image"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    fn png() -> UploadedFile {
        UploadedFile {
            file_name: Some("cover.png".to_string()),
            content_type: Some("image/png".to_string()),
            bytes: Bytes::from_static(b"png"),
        }
    }

    #[test]
    fn store_requires_title_and_thumb() {
        let errors = ProjectUpsert::default().validate_for_store().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("thumb"));
    }

    #[test]
    fn store_rejects_non_image_thumb() {
        let form = ProjectUpsert {
            title: Some("Blog".to_string()),
            thumb: Some(UploadedFile { content_type: Some("text/plain".to_string()), ..png() }),
            ..Default::default()
        };

        let errors = form.validate_for_store().unwrap_err();
        assert!(errors.field_errors().contains_key("thumb"));
    }

    #[test]
    fn store_accepts_minimal_form() {
        let form = ProjectUpsert { title: Some("Blog".to_string()), thumb: Some(png()), ..Default::default() };
        assert!(form.validate_for_store().is_ok());
    }

    #[test]
    fn update_requires_technologies_list() {
        let missing = ProjectUpsert::default();
        assert!(missing.validate_for_update().unwrap_err().field_errors().contains_key("technologies"));

        let empty = ProjectUpsert { technologies: Some(vec![]), ..Default::default() };
        assert!(empty.validate_for_update().is_ok());
    }

    #[test]
    fn link_must_be_url() {
        let form = ProjectUpsert {
            link: Some(Some("not a url".to_string())),
            technologies: Some(vec![]),
            ..Default::default()
        };

        assert!(form.validate_for_update().unwrap_err().field_errors().contains_key("link"));
    }

    #[test]
    fn cleared_fields_pass_validation() {
        let form = ProjectUpsert {
            description: Some(None),
            link: Some(None),
            type_id: Some(None),
            release: Some(None),
            technologies: Some(vec![]),
            ..Default::default()
        };

        assert!(form.validate_for_update().is_ok());
    }

    #[test]
    fn blank_values_are_trimmed_to_none() {
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty(" Blog ".to_string()), Some("Blog".to_string()));
    }
}
