//! 文档分类器
//!
//! 根据源文件路径决定文档分类（即 `docs/` 下的子目录）。
//! 规则按顺序匹配，先匹配者胜出；都不匹配时回退到父目录名，再回退到 "general"。

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// 兜底分类
pub const DEFAULT_CATEGORY: &str = "general";

/// 不能作为分类名的项目根目录名
const RESERVED_PARENT_NAMES: &[&str] = &["src", "app"];

/// 分类规则：匹配规范化路径的正则 + 分类名
pub struct ClassificationRule {
    pattern: Regex,
    category: &'static str,
}

impl ClassificationRule {
    fn new(pattern: &str, category: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("classification pattern must be valid"),
            category,
        }
    }

    pub fn matches(&self, normalized_path: &str) -> bool {
        self.pattern.is_match(normalized_path)
    }

    pub fn category(&self) -> &'static str {
        self.category
    }
}

/// 规则表（顺序即优先级）
static RULES: Lazy<Vec<ClassificationRule>> = Lazy::new(|| {
    [
        (r"(^|/)components/", "components"),
        (r"(^|/)api/", "api"),
        (r"(^|/)hooks/", "hooks"),
        (r"(^|/)utils/", "utils"),
        (r"(^|/)types/", "types"),
        (r"(^|/)lib/", "lib"),
        (r"(^|/)services/", "services"),
        (r"(^|/)middleware/", "middleware"),
        (r"(^|/)pages/", "pages"),
        (r"(^|/)app/(.*/)?page\.(tsx|ts|jsx|js)$", "pages"),
        (r"(^|/)app/(.*/)?layout\.(tsx|ts|jsx|js)$", "layouts"),
        (r"(^|/)app/(.*/)?loading\.(tsx|ts|jsx|js)$", "loading"),
        (r"(^|/)app/(.*/)?(error|not-found)\.(tsx|ts|jsx|js)$", "error"),
    ]
    .into_iter()
    .map(|(pattern, category)| ClassificationRule::new(pattern, category))
    .collect()
});

/// 获取规则表
pub fn rules() -> &'static [ClassificationRule] {
    &RULES
}

/// 规范化路径：统一使用 `/` 分隔并转小写
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/").to_lowercase()
}

/// 根据路径确定文档分类
pub fn classify(path: &str) -> String {
    let normalized = normalize_path(path);

    if let Some(rule) = rules().iter().find(|rule| rule.matches(&normalized)) {
        return rule.category().to_string();
    }

    fallback_category(&normalized)
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string()
}

/// 对 `Path` 分类
pub fn classify_path(path: &Path) -> String {
    classify(&path.to_string_lossy())
}

/// 父目录名回退；文件直接位于根下或父目录为保留名时返回 None
fn fallback_category(normalized: &str) -> Option<&str> {
    let mut segments = normalized.rsplit('/');
    segments.next()?;
    let parent = segments.next()?;

    if parent.is_empty() || parent == "." || parent == ".." {
        return None;
    }
    if RESERVED_PARENT_NAMES.contains(&parent) {
        return None;
    }

    Some(parent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_compile_in_priority_order() {
        let categories: Vec<_> = rules().iter().map(|r| r.category()).collect();
        assert_eq!(
            categories,
            vec![
                "components", "api", "hooks", "utils", "types", "lib", "services",
                "middleware", "pages", "pages", "layouts", "loading", "error",
            ]
        );
    }

    #[test]
    fn test_components_any_case_and_separator() {
        for path in [
            "src/components/Card.tsx",
            "SRC/Components/Card.tsx",
            "src\\components\\Card.tsx",
            "C:\\project\\src\\COMPONENTS\\ui\\Button.jsx",
            "components/Card.tsx",
            "/home/dev/app/src/components/forms/Input.tsx",
        ] {
            assert_eq!(classify(path), "components", "path: {}", path);
        }
    }

    #[test]
    fn test_segment_rules() {
        assert_eq!(classify("src/api/client.ts"), "api");
        assert_eq!(classify("src/hooks/useCart.ts"), "hooks");
        assert_eq!(classify("src/utils/format.ts"), "utils");
        assert_eq!(classify("src/types/user.ts"), "types");
        assert_eq!(classify("src/lib/db.ts"), "lib");
        assert_eq!(classify("src/services/auth.ts"), "services");
        assert_eq!(classify("src/middleware/cors.ts"), "middleware");
        assert_eq!(classify("src/pages/index.tsx"), "pages");
    }

    #[test]
    fn test_segment_must_be_whole_directory() {
        assert_eq!(classify("src/mylib/db.ts"), "mylib");
        assert_eq!(classify("src/apis/client.ts"), "apis");
        // 文件名不是目录段
        assert_eq!(classify("src/widgets/components.tsx"), "widgets");
    }

    #[test]
    fn test_app_router_files() {
        assert_eq!(classify("src/app/page.tsx"), "pages");
        assert_eq!(classify("app/dashboard/settings/page.jsx"), "pages");
        assert_eq!(classify("src/app/layout.tsx"), "layouts");
        assert_eq!(classify("src/app/shop/loading.tsx"), "loading");
        assert_eq!(classify("src/app/error.tsx"), "error");
        assert_eq!(classify("src/app/not-found.js"), "error");
    }

    #[test]
    fn test_app_router_requires_source_extension() {
        assert_eq!(classify("src/app/page.css"), DEFAULT_CATEGORY);
        assert_eq!(classify("src/app/blog/page.mdx"), "blog");
    }

    #[test]
    fn test_first_rule_wins() {
        assert_eq!(classify("src/components/hooks/useToggle.ts"), "components");
        assert_eq!(classify("src/hooks/components/useToggle.ts"), "components");
        assert_eq!(classify("src/lib/api/fetcher.ts"), "api");
        assert_eq!(classify("src/app/components/page.tsx"), "components");
    }

    #[test]
    fn test_parent_directory_fallback() {
        assert_eq!(classify("src/weird/Thing.js"), "weird");
        assert_eq!(classify("src/store/slices/cart.ts"), "slices");
        assert_eq!(classify("src/Context/Theme.tsx"), "context");
    }

    #[test]
    fn test_reserved_parent_falls_back_to_general() {
        assert_eq!(classify("src/index.ts"), DEFAULT_CATEGORY);
        assert_eq!(classify("app/providers.tsx"), DEFAULT_CATEGORY);
        assert_eq!(classify("SRC\\main.ts"), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_no_parent_segment() {
        assert_eq!(classify("Thing.js"), DEFAULT_CATEGORY);
        assert_eq!(classify("/Thing.js"), DEFAULT_CATEGORY);
        assert_eq!(classify("./Thing.js"), DEFAULT_CATEGORY);
        assert_eq!(classify("../Thing.js"), DEFAULT_CATEGORY);
        assert_eq!(classify(""), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let path = "src/features/checkout/Summary.tsx";
        let first = classify(path);
        for _ in 0..10 {
            assert_eq!(classify(path), first);
        }
        assert_eq!(classify_path(Path::new(path)), first);
    }
}
