use chrono::NaiveDate;
use loyalty_registry::PartnerRegistry;
use loyalty_types::{
    ContractAction, ContractId, ContractKind, ContractRecord, PartnerId, Result, RewardError,
};

/// Fields per data row.
pub const FIELD_COUNT: usize = 5;

/// Date format of the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATE_LEN: usize = "YYYY-MM-DD".len();

/// Parse one data row into a contract record.
///
/// `line` is the 1-based line number used in error messages. The partner
/// must already be registered.
pub fn parse_row(line: usize, text: &str, partners: &PartnerRegistry) -> Result<ContractRecord> {
    let fields: Vec<&str> = text.split(',').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(RewardError::malformed(
            line,
            format!(
                "expected {} fields, found {}",
                FIELD_COUNT,
                fields.len()
            ),
        ));
    }

    let partner_id = fields[0]
        .parse::<u64>()
        .map(PartnerId)
        .map_err(|_| RewardError::malformed(line, format!("invalid partner id '{}'", fields[0])))?;
    if !partners.exists(partner_id) {
        return Err(RewardError::malformed(
            line,
            RewardError::PartnerNotFound(partner_id).to_string(),
        ));
    }

    let contract_id = fields[1]
        .parse::<u64>()
        .map(ContractId)
        .map_err(|_| RewardError::malformed(line, format!("invalid contract id '{}'", fields[1])))?;

    let kind: ContractKind = fields[2]
        .parse()
        .map_err(|e: RewardError| RewardError::malformed(line, e.to_string()))?;

    // `%Y-%m-%d` alone would also take unpadded months and days.
    if fields[3].len() != DATE_LEN {
        return Err(RewardError::malformed(
            line,
            format!("invalid date '{}': expected YYYY-MM-DD", fields[3]),
        ));
    }
    let date = NaiveDate::parse_from_str(fields[3], DATE_FORMAT)
        .map_err(|e| RewardError::malformed(line, format!("invalid date '{}': {}", fields[3], e)))?;

    let action: ContractAction = fields[4]
        .parse()
        .map_err(|e: RewardError| RewardError::malformed(line, e.to_string()))?;

    Ok(ContractRecord::from_event(
        contract_id,
        partner_id,
        kind,
        date,
        action,
    ))
}
