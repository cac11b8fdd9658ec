//! Slug 生成工具
//!
//! 根据标题生成URL安全的唯一标识：
//! - [`slugify`] 把标题转换为基础 slug（ASCII音译、小写、连字符分隔）
//! - [`generate_slug`] / [`try_generate_slug`] 在基础 slug 冲突时依次追加 `-1`、`-2`...
//!
//! 唯一性检查由调用方以回调的形式提供，本模块不依赖任何存储。

use std::future::Future;

/// 基础 slug 的最大长度
///
/// `projects.slug` 列为 `VARCHAR(255)`，预留的部分用于 `-<序号>` 后缀。
pub const MAX_SLUG_BASE_LENGTH: usize = 200;

/// 把标题转换为基础 slug
///
/// 先用 [`deunicode`] 音译为ASCII，再转小写，所有非字母数字的连续字符替换为单个 `-`，
/// 最后去掉首尾的 `-`。音译可能让标题变长（例如 `ß` → `ss`），
/// 结果会被截断到 [`MAX_SLUG_BASE_LENGTH`] 以内。
///
/// ```
/// assert_eq!(shared_lib::slugify("My Cool Project"), "my-cool-project");
/// assert_eq!(shared_lib::slugify("  Café -- Déjà vu!  "), "cafe-deja-vu");
/// ```
pub fn slugify(title: &str) -> String {
    let ascii = deunicode::deunicode(title);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_hyphen = false;

    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            let separator = usize::from(pending_hyphen && !slug.is_empty());
            if slug.len() + separator >= MAX_SLUG_BASE_LENGTH {
                break;
            }
            if separator == 1 {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// 基础 slug 的候选序列：`base`, `base-1`, `base-2`, ...
#[derive(Debug, Clone)]
pub struct SlugCandidates {
    base: String,
    counter: u64,
}

impl SlugCandidates {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into(), counter: 0 }
    }
}

impl Iterator for SlugCandidates {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let candidate = match self.counter {
            0 => self.base.clone(),
            n => format!("{}-{}", self.base, n),
        };
        self.counter += 1;
        Some(candidate)
    }
}

/// 生成唯一 slug
///
/// 依次检查候选值，返回第一个 `exists` 为 `false` 的候选。
/// `exists` 对同一个候选值必须是确定的，否则无法保证结果唯一。
pub fn generate_slug<F>(title: &str, mut exists: F) -> String
where
    F: FnMut(&str) -> bool,
{
    SlugCandidates::new(slugify(title))
        .find(|candidate| !exists(candidate))
        .unwrap_or_default()
}

/// [`generate_slug`] 的异步版本
///
/// 用于需要查询数据库的场景，`exists` 返回的第一个错误会原样返回。
pub async fn try_generate_slug<F, Fut, E>(title: &str, mut exists: F) -> Result<String, E>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    for candidate in SlugCandidates::new(slugify(title)) {
        if !exists(candidate.clone()).await? {
            return Ok(candidate);
        }
    }

    unreachable!("slug candidates are unbounded")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn slugify_basic_titles() {
        assert_eq!(slugify("My Cool Project"), "my-cool-project");
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("snake_case and  spaces"), "snake-case-and-spaces");
        assert_eq!(slugify("---trimmed---"), "trimmed");
        assert_eq!(slugify("Vue 3 + TS"), "vue-3-ts");
    }

    #[test]
    fn slugify_transliterates() {
        assert_eq!(slugify("Crème brûlée"), "creme-brulee");
        assert_eq!(slugify("Straße"), "strasse");
    }

    #[test]
    fn slugify_without_alphanumerics_is_empty() {
        assert_eq!(slugify("!!! ???"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn slugify_caps_long_titles() {
        let expanded = "ß".repeat(255);
        assert_eq!(slugify(&expanded).len(), MAX_SLUG_BASE_LENGTH);

        let words = "ab ".repeat(85);
        let slug = slugify(&words);
        assert!(slug.len() <= MAX_SLUG_BASE_LENGTH);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn suffixed_max_length_slug_fits_column() {
        let title = "x".repeat(255);
        let base = slugify(&title);
        let taken: HashSet<String> = SlugCandidates::new(base).take(12).collect();

        let slug = generate_slug(&title, |candidate| taken.contains(candidate));

        assert!(slug.ends_with("-12"));
        assert!(slug.len() <= 255);
    }

    #[test]
    fn first_candidate_is_unsuffixed() {
        let slug = generate_slug("My Cool Project", |_| false);
        assert_eq!(slug, "my-cool-project");
    }

    #[test]
    fn collisions_get_increasing_suffix() {
        let mut taken: HashSet<String> = HashSet::new();

        let slugs: Vec<String> = (0..4)
            .map(|_| {
                let slug = generate_slug("My Cool Project", |candidate| taken.contains(candidate));
                taken.insert(slug.clone());
                slug
            })
            .collect();

        assert_eq!(
            slugs,
            vec!["my-cool-project", "my-cool-project-1", "my-cool-project-2", "my-cool-project-3"]
        );
    }

    #[test]
    fn generated_slug_never_exists() {
        let taken: HashSet<&str> = ["portfolio", "portfolio-1", "portfolio-3"].into_iter().collect();

        let slug = generate_slug("Portfolio", |candidate| taken.contains(candidate));

        assert_eq!(slug, "portfolio-2");
        assert!(!taken.contains(slug.as_str()));
    }

    #[test]
    fn candidates_sequence() {
        let candidates: Vec<String> = SlugCandidates::new("a").take(3).collect();
        assert_eq!(candidates, vec!["a", "a-1", "a-2"]);
    }

    #[tokio::test]
    async fn async_generation_skips_taken_slugs() {
        let taken: HashSet<String> = ["blog".to_string(), "blog-1".to_string()].into_iter().collect();

        let slug = try_generate_slug("Blog", |candidate| {
            let exists = taken.contains(&candidate);
            async move { Ok::<_, String>(exists) }
        })
        .await
        .unwrap();

        assert_eq!(slug, "blog-2");
    }

    #[tokio::test]
    async fn async_generation_propagates_errors() {
        let result = try_generate_slug("Blog", |_| async { Err::<bool, _>("database down") }).await;
        assert_eq!(result, Err("database down"));
    }
}
