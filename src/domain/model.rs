use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 商品投入流通文件（LP_INTRODUCE_GOODS）
///
/// 未設定的欄位仍會序列化，值為 `null`。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub description: Option<Description>,

    #[serde(default)]
    pub doc_id: Option<String>,

    #[serde(default)]
    pub doc_status: Option<String>,

    #[serde(default)]
    pub doc_type: Option<String>,

    #[serde(rename = "importRequest", default)]
    pub import_request: bool,

    #[serde(default)]
    pub owner_inn: Option<String>,

    #[serde(default)]
    pub participant_inn: Option<String>,

    #[serde(default)]
    pub producer_inn: Option<String>,

    #[serde(default)]
    pub production_date: Option<String>,

    #[serde(default)]
    pub production_type: Option<String>,

    #[serde(default)]
    pub products: Option<Vec<Product>>,

    #[serde(default)]
    pub reg_date: Option<String>,

    #[serde(default)]
    pub reg_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Description {
    #[serde(rename = "participantInn", default)]
    pub participant_inn: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub certificate_document: Option<String>,
    #[serde(default)]
    pub certificate_document_date: Option<String>,
    #[serde(default)]
    pub certificate_document_number: Option<String>,
    #[serde(default)]
    pub owner_inn: Option<String>,
    #[serde(default)]
    pub producer_inn: Option<String>,
    #[serde(default)]
    pub production_date: Option<String>,
    #[serde(default)]
    pub tnved_code: Option<String>,
    #[serde(default)]
    pub uit_code: Option<String>,
    #[serde(default)]
    pub uitu_code: Option<String>,
}

impl Document {
    pub fn with_production_date(mut self, date: NaiveDate) -> Self {
        self.production_date = Some(date.format(DATE_FORMAT).to_string());
        self
    }

    pub fn with_reg_date(mut self, date: NaiveDate) -> Self {
        self.reg_date = Some(date.format(DATE_FORMAT).to_string());
        self
    }

    pub fn add_product(&mut self, product: Product) {
        self.products.get_or_insert_with(Vec::new).push(product);
    }

    pub fn product_count(&self) -> usize {
        self.products.as_ref().map(Vec::len).unwrap_or(0)
    }
}

impl Product {
    pub fn with_production_date(mut self, date: NaiveDate) -> Self {
        self.production_date = Some(date.format(DATE_FORMAT).to_string());
        self
    }

    pub fn with_certificate_document_date(mut self, date: NaiveDate) -> Self {
        self.certificate_document_date = Some(date.format(DATE_FORMAT).to_string());
        self
    }
}
