//! 消息模板模块
//!
//! 使用Handlebars渲染用户自定义的消息模板，覆盖默认消息

use crate::config::NotificationContext;
use crate::error::TemplateError;
use handlebars::{handlebars_helper, Handlebars};

/// 模板注册名
const TEMPLATE_NAME: &str = "message";

handlebars_helper!(uppercase: |s: str| s.to_uppercase());
handlebars_helper!(lowercase: |s: str| s.to_lowercase());
handlebars_helper!(uppercasefirst: |s: str| {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    }
});
handlebars_helper!(truncate: |s: str, len: u64| {
    s.chars().take(len as usize).collect::<String>()
});
handlebars_helper!(success: |s: str| s == "success");
handlebars_helper!(failure: |s: str| matches!(s, "failure" | "error" | "killed"));

/// 只转义Slack的控制字符 `&`、`<`、`>`
fn slack_escape(data: &str) -> String {
    let mut output = String::with_capacity(data.len());
    for c in data.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
    output
}

/// Handlebars模板渲染器
///
/// 严格模式下引用未定义字段会报错，不会静默回退到默认消息。
pub struct TemplateRenderer {
    registry: Handlebars<'static>,
}

impl TemplateRenderer {
    /// 编译模板
    ///
    /// # 参数
    /// * `template` - 模板字符串
    ///
    /// # 返回
    /// * `Result<Self, TemplateError>` - 模板有语法错误时返回 `TemplateError::Syntax`
    pub fn new(template: &str) -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(slack_escape);

        registry.register_helper("uppercase", Box::new(uppercase));
        registry.register_helper("lowercase", Box::new(lowercase));
        registry.register_helper("uppercasefirst", Box::new(uppercasefirst));
        registry.register_helper("truncate", Box::new(truncate));
        registry.register_helper("success", Box::new(success));
        registry.register_helper("failure", Box::new(failure));

        registry
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(|e| TemplateError::Syntax(Box::new(e)))?;

        Ok(Self { registry })
    }

    /// 渲染模板并去掉首尾空白
    pub fn render(&self, context: &NotificationContext) -> Result<String, TemplateError> {
        let rendered = self
            .registry
            .render(TEMPLATE_NAME, context)
            .map_err(|e| TemplateError::Render(Box::new(e)))?;
        Ok(rendered.trim().to_string())
    }
}

/// 编译并渲染模板，结果去掉首尾空白
pub fn render_trim(template: &str, context: &NotificationContext) -> Result<String, TemplateError> {
    TemplateRenderer::new(template)?.render(context)
}
