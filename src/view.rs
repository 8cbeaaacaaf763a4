//! HTML 页面渲染
//!
//! 所有插入页面的值都经过 [`escape`]。

use axum::{http::StatusCode, response::Html};
use std::fmt::Write;

use crate::app::product::model::{Product, ProductSummary};

/// HTML 转义
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(ch),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title} - Product Catalog</title>
    <link rel="stylesheet" href="/style.css">
</head>
<body>
    <nav>
        <a href="/">Home</a> |
        <a href="/add-product">Add product</a>
        <form action="/search" method="get" style="display:inline">
            <input type="text" name="q" placeholder="Search products">
            <button type="submit">Search</button>
        </form>
    </nav>
    <main>
{body}
    </main>
</body>
</html>
"#,
        title = escape(title),
    ))
}

fn product_list(products: &[ProductSummary]) -> String {
    if products.is_empty() {
        return "        <p>No products found.</p>\n".to_string();
    }

    let mut out = String::from("        <ul class=\"products\">\n");
    for p in products {
        let _ = writeln!(
            out,
            r#"            <li><a href="/product/{id}">{name}</a> - {description} - ${price:.2}</li>"#,
            id = p.id,
            name = escape(&p.name),
            description = escape(&p.description),
            price = p.price,
        );
    }
    out.push_str("        </ul>\n");
    out
}

/// 首页：产品列表
pub fn home(products: &[ProductSummary]) -> Html<String> {
    let body = format!("        <h1>Products</h1>\n{}", product_list(products));
    layout("Products", &body)
}

/// 产品详情页，附带更新表单
pub fn product_detail(product: &Product, banner: Option<&str>) -> Html<String> {
    let mut body = String::new();
    if let Some(banner) = banner {
        let _ = writeln!(body, r#"        <p class="banner">{}</p>"#, escape(banner));
    }

    let status = if product.is_active { "Active" } else { "Inactive" };
    let _ = write!(
        body,
        r#"        <h1>{name}</h1>
        <p>{description}</p>
        <p>Price: ${price:.2}</p>
        <p>Status: {status}</p>

        <h2>Update</h2>
        <form action="/product/{id}/update" method="post">
            <label>Name <input type="text" name="name" value="{name}"></label><br>
            <label>Description <textarea name="description">
{description}</textarea></label><br>
            <label>Price <input type="text" name="price" value="{price}"></label><br>
            <label>Internal cost <input type="text" name="internal_cost" placeholder="unchanged"></label><br>
            <label>Status <select name="is_active">
                <option value="1"{active}>Active</option>
                <option value="0"{inactive}>Inactive</option>
            </select></label><br>
            <button type="submit">Save</button>
        </form>
        <form action="/product/{id}/delete" method="post">
            <button type="submit">Delete</button>
        </form>
"#,
        id = product.id,
        name = escape(&product.name),
        description = escape(&product.description),
        price = product.price,
        active = if product.is_active { " selected" } else { "" },
        inactive = if product.is_active { "" } else { " selected" },
    );

    layout(&product.name, &body)
}

/// 搜索结果页
pub fn search_results(term: &str, products: &[ProductSummary]) -> Html<String> {
    let body = format!(
        "        <h1>Search results for \"{}\"</h1>\n{}",
        escape(term),
        product_list(products)
    );
    layout("Search", &body)
}

/// 新增产品表单
pub fn add_product_form() -> Html<String> {
    let body = r#"        <h1>Add product</h1>
        <form action="/add-product" method="post">
            <label>Name <input type="text" name="name" required></label><br>
            <label>Description <textarea name="description"></textarea></label><br>
            <label>Price <input type="text" name="price"></label><br>
            <label>Internal cost <input type="text" name="internal_cost"></label><br>
            <label>Status <select name="is_active">
                <option value="1" selected>Active</option>
                <option value="0">Inactive</option>
            </select></label><br>
            <button type="submit">Add</button>
        </form>
"#;
    layout("Add product", body)
}

/// 诊断命令输出
pub fn command_output(stdout: &str) -> Html<String> {
    Html(format!("<pre>Command Output:\n{}</pre>", escape(stdout)))
}

/// 抓取结果，被截断时末尾标注 `(truncated)`
pub fn fetched_content(url: &str, body: &str, truncated: bool) -> Html<String> {
    Html(format!(
        "<pre>Fetched content from {}:\n{}{}</pre>",
        escape(url),
        escape(body),
        if truncated { "\n(truncated)" } else { "" }
    ))
}

/// 错误页
pub fn error_page(status: StatusCode, message: &str, request_id: &str) -> Html<String> {
    let body = format!(
        "        <h1>{code} {reason}</h1>\n        <p>{message}</p>\n        <p><small>Request ID: {request_id}</small></p>\n",
        code = status.as_u16(),
        reason = status.canonical_reason().unwrap_or("Error"),
        message = escape(message),
        request_id = escape(request_id),
    );
    layout("Error", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("x" & 'y')</script>"#),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#x27;y&#x27;)&lt;&#x2F;script&gt;"
        );
        assert_eq!(escape("plain text"), "plain text");
    }

    #[test]
    fn test_detail_hides_internal_cost() {
        let product = Product {
            id: 7,
            name: "Widget".to_string(),
            description: "<b>bold</b>".to_string(),
            price: 9.5,
            internal_cost: 1234.56,
            is_active: false,
        };

        let Html(page) = product_detail(&product, Some("Product updated."));
        assert!(page.contains("Price: $9.50"));
        assert!(page.contains("Status: Inactive"));
        assert!(page.contains("&lt;b&gt;bold&lt;&#x2F;b&gt;"));
        assert!(page.contains("Product updated."));
        assert!(!page.contains("1234.56"));
    }

    #[test]
    fn test_update_form_keeps_price_and_description() {
        let product = Product {
            id: 3,
            name: "Scale".to_string(),
            description: "\nsecond line".to_string(),
            price: 12.345,
            internal_cost: 0.0,
            is_active: true,
        };

        let Html(page) = product_detail(&product, None);
        assert!(page.contains(r#"name="price" value="12.345""#));
        assert!(page.contains("<textarea name=\"description\">\n\nsecond line</textarea>"));
    }

    #[test]
    fn test_fetched_content_marks_truncation() {
        let Html(full) = fetched_content("http://a.test/", "body", false);
        assert!(!full.contains("(truncated)"));

        let Html(cut) = fetched_content("http://a.test/", "bo", true);
        assert!(cut.contains("bo\n(truncated)</pre>"));
    }

    #[test]
    fn test_empty_list() {
        let Html(page) = home(&[]);
        assert!(page.contains("No products found."));
    }
}
