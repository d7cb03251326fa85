//! Partial update statement for the `devices` relation
//!
//! The SET clause is driven by a fixed, ordered rule table. Each field is
//! either always written or written only when the supplied value is
//! non-empty, and each written field consumes the next `$n` placeholder.

use chrono::{DateTime, Utc};

use crate::models::UpdateDeviceRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateRule {
    Always,
    IfNonEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateField {
    LastUpdated,
    Name,
    SerialNumber,
    HouseId,
    DeviceModelId,
}

impl UpdateField {
    /// Statement order of the SET clause
    pub const ORDER: [UpdateField; 5] = [
        UpdateField::LastUpdated,
        UpdateField::Name,
        UpdateField::SerialNumber,
        UpdateField::HouseId,
        UpdateField::DeviceModelId,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            UpdateField::LastUpdated => "last_updated",
            UpdateField::Name => "name",
            UpdateField::SerialNumber => "serial_number",
            UpdateField::HouseId => "house_id",
            UpdateField::DeviceModelId => "device_model_id",
        }
    }

    pub fn rule(&self) -> UpdateRule {
        match self {
            UpdateField::Name | UpdateField::SerialNumber => UpdateRule::IfNonEmpty,
            UpdateField::LastUpdated | UpdateField::HouseId | UpdateField::DeviceModelId => {
                UpdateRule::Always
            }
        }
    }

    fn value(&self, req: &UpdateDeviceRequest, now: DateTime<Utc>) -> BindValue {
        match self {
            UpdateField::LastUpdated => BindValue::Timestamp(now),
            UpdateField::Name => BindValue::Text(req.name.clone()),
            UpdateField::SerialNumber => BindValue::Text(req.serial_number.clone()),
            UpdateField::HouseId => BindValue::Int(req.house_id),
            UpdateField::DeviceModelId => BindValue::Int(req.device_model_id),
        }
    }
}

/// Positional parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Timestamp(DateTime<Utc>),
    Text(String),
    Int(i32),
}

impl BindValue {
    fn is_empty(&self) -> bool {
        matches!(self, BindValue::Text(s) if s.is_empty())
    }
}

/// Built UPDATE statement plus its ordered parameters
#[derive(Debug, Clone)]
pub struct DeviceUpdateQuery {
    sql: String,
    fields: Vec<UpdateField>,
    values: Vec<BindValue>,
}

impl DeviceUpdateQuery {
    pub fn new(id: i32, req: &UpdateDeviceRequest, now: DateTime<Utc>) -> Self {
        let mut assignments = Vec::with_capacity(UpdateField::ORDER.len());
        let mut fields = Vec::with_capacity(UpdateField::ORDER.len());
        let mut values = Vec::with_capacity(UpdateField::ORDER.len() + 1);

        for field in UpdateField::ORDER {
            let value = field.value(req, now);
            if field.rule() == UpdateRule::IfNonEmpty && value.is_empty() {
                continue;
            }
            values.push(value);
            fields.push(field);
            assignments.push(format!("{} = ${}", field.column(), values.len()));
        }

        values.push(BindValue::Int(id));
        let sql = format!(
            "UPDATE devices SET {} WHERE id = ${} \
             RETURNING id, device_model_id, house_id, serial_number, name, status, last_updated, created_at",
            assignments.join(", "),
            values.len()
        );

        Self {
            sql,
            fields,
            values,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Fields written by this statement, in placeholder order
    pub fn fields(&self) -> &[UpdateField] {
        &self.fields
    }

    /// Parameters in placeholder order; the last one is the device id
    pub fn values(&self) -> &[BindValue] {
        &self.values
    }
}
