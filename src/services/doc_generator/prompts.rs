//! LLM Prompt 模板
//!
//! 定义组件文档生成使用的 Prompt 模板

/// 系统提示词（仅 API 模式使用）
pub const SYSTEM_PROMPT: &str =
    "你是一名资深前端工程师和技术文档作者，擅长为 React / Next.js 代码编写准确、简洁的 Markdown 文档。";

/// 组件文档生成 Prompt
pub const COMPONENT_DOC_PROMPT: &str = r#"请为以下源码文件编写技术文档，使用 Markdown 格式输出。

文件路径: {file_path}

代码内容:
```
{code_content}
```

文档必须包含以下六个部分（按顺序，使用二级标题）：

## 概述
用一到两段话说明这个文件的作用，以及它在项目中的位置。

## 功能特性
列出文件提供的主要功能，每条一句话。

## 参数 / Props
如果是组件，列出所有 Props（名称、类型、是否必填、默认值、说明），使用表格。
如果是函数、Hook 或 API，列出参数和返回值。没有则写"无"。

## 使用示例
给出一到两个最典型的用法代码示例。

## 依赖关系
列出该文件依赖的内部模块和第三方库。

## 技术说明
说明实现上的关键点、注意事项、性能或边界情况。

## 要求
- 只描述代码中实际存在的内容，禁止编造
- 直接输出文档正文，不要添加额外的开场白或结束语
"#;

/// 格式化组件文档 Prompt
///
/// 只替换模板自身的占位符，路径和源码中出现的同名文本保持原样
pub fn format_component_doc_prompt(file_path: &str, code_content: &str) -> String {
    COMPONENT_DOC_PROMPT
        .split("{code_content}")
        .map(|part| part.replace("{file_path}", file_path))
        .collect::<Vec<_>>()
        .join(code_content)
}
