pub mod registry;

pub use registry::IndicatorRegistry;

use serde::{Deserialize, Serialize};

/// How a raw figure for an indicator is scaled and sanity-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorFamily {
    /// Monetary amount; unit multipliers apply.
    Amount,
    /// Percentage or ratio; never scaled, values above 100 without an explicit unit are dropped.
    Percentage,
    /// Plain count; stored as read.
    Count,
}

macro_rules! indicators {
    ($($variant:ident => $key:literal, $family:ident, $label:literal;)+) => {
        /// Closed set of canonical financial indicators.
        ///
        /// Declaration order is the synonym matching order of the default
        /// registry and the serialization order of [`crate::model::FinancialRecord`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum Indicator {
            $($variant,)+
        }

        impl Indicator {
            pub const ALL: &'static [Indicator] = &[$(Indicator::$variant,)+];
            pub const COUNT: usize = Indicator::ALL.len();

            /// Stable snake_case key used in JSON output.
            pub fn key(self) -> &'static str {
                match self {
                    $(Indicator::$variant => $key,)+
                }
            }

            pub fn family(self) -> IndicatorFamily {
                match self {
                    $(Indicator::$variant => IndicatorFamily::$family,)+
                }
            }

            /// Human-readable label as it appears in reports.
            pub fn label(self) -> &'static str {
                match self {
                    $(Indicator::$variant => $label,)+
                }
            }
        }
    };
}

indicators! {
    TotalAssets => "total_assets", Amount, "Итого активов";
    TotalLiabilities => "total_liabilities", Amount, "Итого обязательств";
    LoansToCustomers => "loans_to_customers", Amount, "Кредиты и авансы клиентам";
    DepositsFromCustomers => "deposits_from_customers", Amount, "Средства клиентов";
    Equity => "equity", Amount, "Итого собственных средств";
    CashAndEquivalents => "cash_and_equivalents", Amount, "Денежные средства и их эквиваленты";
    NetIncome => "net_income", Amount, "Чистая прибыль";
    OperatingIncome => "operating_income", Amount, "Операционный доход";
    OperatingProfit => "operating_profit", Amount, "Операционная прибыль";
    Roa => "roa", Percentage, "ROA";
    Roe => "roe", Percentage, "ROE";
    NetInterestMargin => "net_interest_margin", Percentage, "Чистая процентная маржа";
    CostToIncomeRatio => "cost_to_income_ratio", Percentage, "Отношение затрат к доходу";
    NonPerformingLoanRatio => "non_performing_loan_ratio", Percentage, "Доля неработающих кредитов";
    CapitalAdequacyRatio => "capital_adequacy_ratio", Percentage, "Коэффициент достаточности капитала";
    DigitalPenetration => "digital_penetration", Percentage, "Доля цифровых клиентов";
    MobilePenetration => "mobile_penetration", Percentage, "Доля мобильных клиентов";
    ActiveDigitalCustomers => "active_digital_customers", Count, "Активные цифровые клиенты";
    NumberOfBranches => "number_of_branches", Count, "Количество отделений";
    ItStaff => "it_staff", Count, "IT-персонал";
    ApiCount => "api_count", Count, "Количество API";
    PaperlessOperations => "paperless_operations", Count, "Безбумажные операции";
    ElectronicSignatureUsage => "electronic_signature_usage", Count, "Электронная подпись";
    RemoteAccountOpening => "remote_account_opening", Count, "Дистанционное открытие счета";
    ChurnRate => "churn_rate", Percentage, "Отток клиентов";
    RetentionRate => "retention_rate", Percentage, "Удержание клиентов";
    ProductsPerCustomer => "products_per_customer", Count, "Количество продуктов на клиента";
    CrossSellRate => "cross_sell_rate", Percentage, "Кросс-продажи";
    WalletShare => "wallet_share", Percentage, "Доля рынка";
    CreditCost => "credit_cost", Percentage, "Стоимость риска";
    LoanLossProvisionCoverage => "loan_loss_provision_coverage", Percentage, "Коэффициент резервирования";
    NetInterestIncome => "net_interest_income", Amount, "Чистый процентный доход";
    SubordinatedDebt => "subordinated_debt", Amount, "Субординированный долг";
    InterestEarningAssets => "interest_earning_assets", Amount, "Процентные активы";
    InterestBearingLiabilities => "interest_bearing_liabilities", Amount, "Процентные обязательства";
    NetInterestSpread => "net_interest_spread", Percentage, "Процентный спред";
    InterbankAssets => "interbank_assets", Amount, "Межбанковские активы";
    InterbankLiabilities => "interbank_liabilities", Amount, "Межбанковские обязательства";
    EquityToDebtRatio => "equity_to_debt_ratio", Percentage, "Соотношение собственного капитала к заемному";
    RetainedEarningsToTotalAssets => "retained_earnings_to_total_assets", Percentage, "Соотношение нераспределенной прибыли к активам";
    EbitToTotalAssets => "ebit_to_total_assets", Percentage, "Соотношение прибыли до вычета процентов и налогов к активам";
    TotalAssetsTurnover => "total_assets_turnover", Percentage, "Оборачиваемость активов";
    ReturnOnNetAssets => "return_on_net_assets", Percentage, "Return on net assets";
    ReturnOnAverageTotalAssets => "return_on_average_total_assets", Percentage, "Return on average total assets";
    ReturnOnNetAssetsAfterDeductingNonRecurring => "return_on_net_assets_after_deducting_non_recurring", Percentage, "Return on net assets after deducting non-recurring profit and loss";
    InterbankAssetsToInterestEarningAssets => "interbank_assets_to_interest_earning_assets", Percentage, "Соотношение межбанковских активов к процентным активам";
    DepositsToInterestBearingLiabilities => "deposits_to_interest_bearing_liabilities", Percentage, "Соотношение депозитов к процентным обязательствам";
    InterbankLiabilitiesToInterestBearingLiabilities => "interbank_liabilities_to_interest_bearing_liabilities", Percentage, "Соотношение межбанковских обязательств к процентным обязательствам";
    EpsBasic => "eps_basic", Amount, "EPS (базовая)";
    NonPerformingLoansBalance => "non_performing_loans_balance", Amount, "Balance of non-performing loans";
    NumberCorporateOnlineBankingCustomers => "number_corporate_online_banking_customers", Count, "Количество корпоративных клиентов интернет-банка";
    NumberPersonalOnlineBankingCustomers => "number_personal_online_banking_customers", Count, "Количество частных клиентов интернет-банка";
    NumberMobileBankingCustomers => "number_mobile_banking_customers", Count, "Количество пользователей мобильного банкинга";
    NumberTelephoneBankingCustomers => "number_telephone_banking_customers", Count, "Количество клиентов телефонного банкинга";
    TransactionAmountCorporateOnlineBanking => "transaction_amount_corporate_online_banking", Amount, "Объем транзакций корпоративного онлайн-банкинга";
    TransactionAmountPersonalOnlineBanking => "transaction_amount_personal_online_banking", Amount, "Объем транзакций частного онлайн-банкинга";
    TransactionAmountMobileBanking => "transaction_amount_mobile_banking", Amount, "Объем транзакций мобильного банкинга";
    TransactionAmountSelfServiceBanking => "transaction_amount_self_service_banking", Amount, "Объем транзакций через устройства самообслуживания";
    EbankingTransactionVolume => "ebanking_transaction_volume", Amount, "Объем электронных транзакций";
    EbankingSubstitutionRatio => "ebanking_substitution_ratio", Percentage, "Доля электронных каналов в общем количестве операций";
    CustomerSatisfactionLevel => "customer_satisfaction_level", Percentage, "Уровень удовлетворенности клиентов";
    NumberMobileCashAgents => "number_mobile_cash_agents", Count, "Количество агентов мобильного снятия наличных";
    MonthlyActiveMobileBankingCustomers => "monthly_active_mobile_banking_customers", Count, "Количество активных пользователей мобильного банка в месяц";
}

impl Indicator {
    pub fn from_key(key: &str) -> Option<Indicator> {
        Indicator::ALL.iter().copied().find(|i| i.key() == key)
    }

    /// Headline amounts that reports often state in billions without saying so.
    pub fn assumes_billions(self) -> bool {
        matches!(
            self,
            Indicator::TotalAssets
                | Indicator::LoansToCustomers
                | Indicator::DepositsFromCustomers
                | Indicator::NetIncome
                | Indicator::OperatingIncome
        )
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_follows_declaration_order() {
        for (i, indicator) in Indicator::ALL.iter().enumerate() {
            assert_eq!(indicator.index(), i);
        }
    }

    #[test]
    fn test_key_round_trip() {
        for indicator in Indicator::ALL {
            assert_eq!(Indicator::from_key(indicator.key()), Some(*indicator));
        }
        assert_eq!(Indicator::from_key("no_such_indicator"), None);
    }

    #[test]
    fn test_serde_key_matches_key() {
        for indicator in Indicator::ALL {
            let json = serde_json::to_string(indicator).unwrap();
            assert_eq!(json, format!("\"{}\"", indicator.key()));
        }
    }

    #[test]
    fn test_families() {
        assert_eq!(Indicator::TotalAssets.family(), IndicatorFamily::Amount);
        assert_eq!(Indicator::Roe.family(), IndicatorFamily::Percentage);
        assert_eq!(Indicator::NumberOfBranches.family(), IndicatorFamily::Count);
    }

    #[test]
    fn test_assumed_billions_subset() {
        let subset: Vec<_> = Indicator::ALL
            .iter()
            .filter(|i| i.assumes_billions())
            .collect();
        assert_eq!(subset.len(), 5);
        assert!(!Indicator::TotalLiabilities.assumes_billions());
        assert!(!Indicator::Roe.assumes_billions());
    }
}
