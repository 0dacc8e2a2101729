//! Chart-of-accounts codes used in Russian bank statements.

/// Known account codes and their descriptions.
pub const BANK_ACCOUNT_CODES: &[(&str, &str)] = &[
    // Assets
    ("10101", "Касса кредитной организации"),
    ("10202", "Денежные средства в Банке России"),
    ("10203", "Денежные средства в кредитных организациях"),
    ("10302", "Средства в Банке России на корреспондентских счетах"),
    ("10303", "Средства в кредитных организациях на корреспондентских счетах"),
    ("10501", "Драгоценные металлы"),
    ("10601", "Драгоценные камни"),
    ("10801", "Собственные акции, выкупленные у акционеров"),
    ("10901", "Незавершенные строительные проекты"),
    ("11001", "Материалы"),
    ("11501", "Долговые ценные бумаги"),
    ("11502", "Долговые ценные бумаги, приобретенные для торговли"),
    ("11503", "Долговые ценные бумаги, предназначенные для продажи"),
    ("11504", "Долговые ценные бумаги для удержания до погашения"),
    ("11505", "Долговые ценные бумаги для продажи по справедливой стоимости"),
    ("11601", "Кредиты, предоставленные юридическим лицам"),
    ("11602", "Кредиты, предоставленные физическим лицам"),
    ("11603", "Кредиты, предоставленные бюджетным организациям"),
    ("11701", "Основные средства"),
    ("11801", "Нематериальные активы"),
    ("11901", "Отложенные налоговые активы"),
    // Liabilities and capital
    ("20202", "Депозиты физических лиц"),
    ("20203", "Депозиты юридических лиц"),
    ("20204", "Депозиты бюджетных организаций"),
    ("20301", "Средства клиентов (депонентов)"),
    ("20501", "Кредиты, полученные от Банка России"),
    ("20502", "Кредиты, полученные от кредитных организаций"),
    ("20601", "Выпущенные облигации"),
    ("20801", "Уставный капитал"),
    ("20901", "Добавочный капитал"),
    ("21001", "Резервы под обесценение активов"),
    ("21101", "Нераспределенная прибыль (непокрытый убыток)"),
    // Income statement
    ("70601", "Процентные доходы"),
    ("70602", "Процентные расходы"),
    ("70701", "Комиссионные доходы"),
    ("70702", "Комиссионные расходы"),
    ("71101", "Доходы от операций с ценными бумагами"),
    ("71102", "Расходы от операций с ценными бумагами"),
    ("71501", "Доходы от участия в других организациях"),
    ("71601", "Внереализационные доходы"),
    ("71602", "Внереализационные расходы"),
    ("72501", "Расходы на оплату труда"),
    ("72601", "Отчисления на социальное страхование и обеспечение"),
    ("72701", "Амортизация"),
    ("73101", "Прочие операционные расходы"),
    ("73201", "Резервы под обесценение ценных бумаг"),
    ("73301", "Резервы под обесценение долговых требований"),
    ("73401", "Резервы под возможные потери по обязательствам"),
    ("73501", "Налог на прибыль"),
];

/// Section totals counted as assets even without the leading "1".
pub const TOTAL_ASSETS_CODES: &[&str] = &[
    "11000", "11100", "11200", "11300", "11400", "11500", "11600", "11700", "11800", "11900",
];
pub const TOTAL_LIABILITIES_CODES: &[&str] = &[
    "21000", "21100", "21200", "21300", "21400", "21500", "21600", "21700", "21800", "21900",
];
pub const CASH_CODES: &[&str] = &["10101", "10202", "10302"];
pub const LOAN_CODES: &[&str] = &["11601", "11602", "11603"];
pub const DEPOSIT_CODES: &[&str] = &["20202", "20203", "20204", "20301"];

pub const INTEREST_INCOME: &str = "70601";
pub const INTEREST_EXPENSE: &str = "70602";
pub const COMMISSION_INCOME: &str = "70701";
pub const COMMISSION_EXPENSE: &str = "70702";

pub fn account_label(code: &str) -> Option<&'static str> {
    BANK_ACCOUNT_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

/// Map a code read from text onto the code table.
///
/// An exact hit is kept as is. A shorter code ("1060") resolves to the first
/// known code it prefixes ("10601"). Anything else is kept verbatim.
pub fn resolve_code(raw: &str) -> String {
    if account_label(raw).is_some() {
        return raw.to_string();
    }
    BANK_ACCOUNT_CODES
        .iter()
        .map(|(c, _)| *c)
        .find(|c| c.starts_with(raw))
        .unwrap_or(raw)
        .to_string()
}

pub fn is_asset_code(code: &str) -> bool {
    code.starts_with('1') || TOTAL_ASSETS_CODES.contains(&code)
}

pub fn is_liability_code(code: &str) -> bool {
    code.starts_with('2') || TOTAL_LIABILITIES_CODES.contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_label() {
        assert_eq!(account_label("10101"), Some("Касса кредитной организации"));
        assert_eq!(account_label("99999"), None);
    }

    #[test]
    fn test_resolve_code_exact_prefix_and_unknown() {
        assert_eq!(resolve_code("20801"), "20801");
        assert_eq!(resolve_code("1060"), "10601");
        assert_eq!(resolve_code("7060"), "70601");
        assert_eq!(resolve_code("45210"), "45210");
    }

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<&str> = BANK_ACCOUNT_CODES.iter().map(|(c, _)| *c).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), BANK_ACCOUNT_CODES.len());
    }

    #[test]
    fn test_asset_and_liability_classes() {
        assert!(is_asset_code("11601"));
        assert!(is_asset_code("11000"));
        assert!(is_liability_code("20202"));
        assert!(!is_asset_code("70601"));
        assert!(!is_liability_code("70601"));
    }
}
