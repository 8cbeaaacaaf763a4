//! 产品数据模型

use serde::{Deserialize, Deserializer, Serialize};

/// 完整的产品记录，`internal_cost` 只在内部使用
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub internal_cost: f64,
    pub is_active: bool,
}

/// 公开列表使用的字段
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
}

/// 新增与更新共用的表单，未列出的字段被忽略
///
/// 表单与 JSON 请求体都绑定到这里；JSON 的数字和布尔值先转成文本，
/// 再走同一套宽松解析。
#[derive(Debug, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default, deserialize_with = "scalar_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub internal_cost: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub is_active: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Text(text) => text,
            Scalar::Integer(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Flag(flag) => flag.to_string(),
        }
    }
}

fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(String::from))
}

/// 解析后的新产品
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub internal_cost: f64,
    pub is_active: bool,
}

/// 解析后的字段修改
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub internal_cost: Option<f64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    pub status: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ProductForm {
    /// `name` 缺失或为空白时返回 `None`
    pub fn into_new_product(self) -> Option<NewProduct> {
        let name = non_blank(self.name)?;
        Some(NewProduct {
            name,
            description: self.description.unwrap_or_default(),
            price: self.price.as_deref().map(coerce_f64).unwrap_or(0.0),
            internal_cost: self.internal_cost.as_deref().map(coerce_f64).unwrap_or(0.0),
            is_active: self.is_active.as_deref().map(coerce_flag).unwrap_or(false),
        })
    }

    /// 缺省的字段保持原值；除 `description` 外，空白也视为缺省
    pub fn into_changes(self) -> ProductChanges {
        ProductChanges {
            name: non_blank(self.name),
            description: self.description,
            price: non_blank(self.price).as_deref().map(coerce_f64),
            internal_cost: non_blank(self.internal_cost).as_deref().map(coerce_f64),
            is_active: non_blank(self.is_active).as_deref().map(coerce_flag),
        }
    }
}

/// 尽力解析浮点数：取最长的浮点语法前缀，失败为 0
///
/// 前缀形如 `[+-]digits[.digits][(e|E)[+-]digits]`，只扫描一遍，只解析一次。
pub fn coerce_f64(input: &str) -> f64 {
    let trimmed = input.trim_start();
    let bytes = trimmed.as_bytes();

    let skip_digits = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_end = skip_digits(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = skip_digits(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }

    if mantissa_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = skip_digits(exp);
        // 没有指数数字时 `e` 不算前缀
        if exp_end > exp {
            end = exp_end;
        }
    }

    match trimmed[..end].parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// 尽力解析开关值：整数前缀非零为真，另外接受 on/true/yes
///
/// 只看数字是否全为 0，超出 i64 的前缀同样为真。
pub fn coerce_flag(input: &str) -> bool {
    let trimmed = input.trim();
    if ["on", "true", "yes"]
        .iter()
        .any(|w| trimmed.eq_ignore_ascii_case(w))
    {
        return true;
    }

    let unsigned = trimmed
        .strip_prefix(['-', '+'])
        .unwrap_or(trimmed);

    unsigned
        .bytes()
        .take_while(u8::is_ascii_digit)
        .any(|b| b != b'0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_f64() {
        assert_eq!(coerce_f64("19.99"), 19.99);
        assert_eq!(coerce_f64("  42"), 42.0);
        assert_eq!(coerce_f64("12abc"), 12.0);
        assert_eq!(coerce_f64("3.5.1"), 3.5);
        assert_eq!(coerce_f64("-2e2"), -200.0);
        assert_eq!(coerce_f64("abc"), 0.0);
        assert_eq!(coerce_f64(""), 0.0);
        assert_eq!(coerce_f64("1e999"), 0.0);
        assert_eq!(coerce_f64(".5"), 0.5);
        assert_eq!(coerce_f64("7e"), 7.0);
        assert_eq!(coerce_f64("7e+x"), 7.0);
        assert_eq!(coerce_f64("-"), 0.0);
        assert_eq!(coerce_f64("."), 0.0);
        assert_eq!(coerce_f64("+1.5E-1kg"), 0.15);
    }

    #[test]
    fn test_coerce_f64_long_input() {
        let started = std::time::Instant::now();

        let digits = "1".repeat(200_000);
        assert_eq!(coerce_f64(&digits), 0.0);

        let fraction = format!("0.{}", "1".repeat(200_000));
        let value = coerce_f64(&fraction);
        assert!((value - 0.111_111).abs() < 1e-6);

        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }

    #[test]
    fn test_coerce_flag() {
        assert!(coerce_flag("1"));
        assert!(coerce_flag("7 days"));
        assert!(coerce_flag("on"));
        assert!(coerce_flag("TRUE"));
        assert!(!coerce_flag("0"));
        assert!(!coerce_flag(""));
        assert!(!coerce_flag("off"));
        assert!(!coerce_flag("-"));
        assert!(!coerce_flag("-000"));
        assert!(coerce_flag("99999999999999999999"));
        assert!(coerce_flag("-2"));
    }

    #[test]
    fn test_json_scalars_become_text() {
        let form: ProductForm = serde_json::from_str(
            r#"{"name": "Lamp", "price": 12.345, "internal_cost": 3, "is_active": true, "description": null, "role": "admin"}"#,
        )
        .unwrap();

        assert_eq!(form.name.as_deref(), Some("Lamp"));
        assert_eq!(form.price.as_deref(), Some("12.345"));
        assert_eq!(form.internal_cost.as_deref(), Some("3"));
        assert_eq!(form.is_active.as_deref(), Some("true"));
        assert_eq!(form.description, None);

        let product = form.into_new_product().unwrap();
        assert_eq!(product.price, 12.345);
        assert!(product.is_active);
    }

    #[test]
    fn test_create_form_requires_name() {
        let form = ProductForm {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(form.into_new_product().is_none());

        let form = ProductForm {
            name: Some("Lamp".to_string()),
            price: Some("12.5".to_string()),
            ..Default::default()
        };
        assert_eq!(
            form.into_new_product(),
            Some(NewProduct {
                name: "Lamp".to_string(),
                description: String::new(),
                price: 12.5,
                internal_cost: 0.0,
                is_active: false,
            })
        );
    }

    #[test]
    fn test_update_form_blank_keeps_value() {
        let form = ProductForm {
            name: Some("".to_string()),
            description: Some("".to_string()),
            price: Some(" ".to_string()),
            internal_cost: None,
            is_active: Some("0".to_string()),
        };
        let changes = form.into_changes();
        assert_eq!(changes.name, None);
        assert_eq!(changes.description, Some(String::new()));
        assert_eq!(changes.price, None);
        assert_eq!(changes.internal_cost, None);
        assert_eq!(changes.is_active, Some(false));
    }
}
