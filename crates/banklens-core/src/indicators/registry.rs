use crate::error::BankLensError;
use crate::indicators::Indicator;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Built-in Russian (and some English) synonyms, in matching order.
///
/// Order matters: the first indicator with a matching pattern wins, so broad
/// patterns of earlier indicators shadow later ones ("рентабельность.*активов"
/// claims every asset-return label before the narrower return indicators).
/// Short acronyms carry word boundaries so "api" does not hit "капитал".
pub const DEFAULT_SYNONYMS: &[(Indicator, &[&str])] = &[
    (Indicator::TotalAssets, &["итого активов", "валюта баланса", "активы всего", "всего активов", "^активы$", "активы.*конец", r"^total assets\b"]),
    (Indicator::TotalLiabilities, &["итого обязательств", "обязательства всего", "всего обязательств", "^обязательства$", r"^total liabilities\b"]),
    (Indicator::LoansToCustomers, &["кредиты и авансы клиентам", "кредитный портфель", "ссуды клиентам", "выданные кредиты", "кредиты.*физическим", "кредиты.*юридическим", r"\btotal loans?\b", r"\bloans to customers\b"]),
    (Indicator::DepositsFromCustomers, &["депозиты", "привлеченные средства", "средства клиентов", "обязательства.*клиентов", "вклады", r"\btotal deposits\b", r"\bdeposits from customers\b"]),
    (Indicator::Equity, &["^итого собственн", "^итого капитал", "собственные средства", "^собственный капитал", "^капитал всего", r"^total equity\b", r"shareholders'? equity"]),
    (Indicator::CashAndEquivalents, &["денежные средства и их эквиваленты", "денежные средства", "^касса", r"\bcash and (cash )?equivalents\b"]),
    (Indicator::NetIncome, &["чистая прибыль", "прибыль.*налог", "прибыль за год", "прибыль.*отчетный период", r"\bnet (income|profit)\b", r"\bprofit for the year\b"]),
    (Indicator::OperatingIncome, &["операционный доход", "операционные поступления", "доходы от основной деятельности", "доходы.*основная", "выручка от основной деятельности", r"\boperating income\b"]),
    (Indicator::OperatingProfit, &["операционная прибыль", "прибыль от основной деятельности", r"\boperating profit\b"]),
    (Indicator::Roa, &[r"\broa\b", "рентабельность активов", r"\bроа\b", "рентабельность.*активов", r"\breturn on assets\b"]),
    (Indicator::Roe, &[r"\broe\b", "рентабельность собственного капитала", r"\bроэ\b", "рентабельность.*капитала", r"\breturn on equity\b"]),
    (Indicator::NetInterestMargin, &["чистая процентная маржа", "процентная маржа", r"\bnpm\b", r"\bnim\b", "чистая.*маржа", r"\bnet interest margin\b"]),
    (Indicator::CostToIncomeRatio, &["затраты к доходу", r"\bcir\b", "отношение затрат к доходу", "коэффициент затрат", "соотношение расходов к доходам", r"\bcost[- ]to[- ]income\b"]),
    (Indicator::NonPerformingLoanRatio, &["неработающ.*кредит", r"\bnpl\b", "просрочен.*кредит", "стадия 3", "просроченная задолженность", r"\bнпл\b", "non-performing loans to total loans"]),
    (Indicator::CapitalAdequacyRatio, &["коэффициент.*адекватности", "достаточност.*капитала", "базель", "капитал.*уровень", r"\bcet1\b", "базовый капитал", r"\bcapital adequacy\b"]),
    (Indicator::DigitalPenetration, &["доля цифровых клиентов", "цифровая проницаемость", "цифровые клиенты.*доля", "цифровизация.*клиентов"]),
    (Indicator::MobilePenetration, &["мобильная проницаемость", "доля мобильных клиентов", "мобильный банкинг.*доля", "мобильные.*клиенты"]),
    (Indicator::ActiveDigitalCustomers, &["активные цифровые клиенты", r"\bmau\b", "активные пользователи", "активные клиенты.*мобильный", "активные.*цифровые"]),
    (Indicator::NumberOfBranches, &["количество отделений", "число отделений", "сеть отделений", "отделения и филиалы.*количество", "офисы.*количество"]),
    (Indicator::ItStaff, &["it-персонал", "технический персонал", r"\bit staff\b", "сотрудники.*информационные технологии", r"специалисты.*\bит\b"]),
    (Indicator::ApiCount, &[r"\bapi\b", "интерфейс прикладного программирования"]),
    (Indicator::PaperlessOperations, &["безбумажный", "безбумажные операции", "безбумажные процессы", "электронный документооборот"]),
    (Indicator::ElectronicSignatureUsage, &["электронная подпись", "цифровая подпись", "e-подпись", r"\bэцп\b", "электронно-цифровая подпись"]),
    (Indicator::RemoteAccountOpening, &["удаленное открытие счета", "дистанционное открытие счета", "онлайн-открытие счета", "цифровое открытие счета"]),
    (Indicator::ChurnRate, &["коэффициент оттока", "отток клиентов", r"\bchurn\b", "отток.*клиенты"]),
    (Indicator::RetentionRate, &["коэффициент удержания", "удержание клиентов", "лояльность", "удержание.*клиенты"]),
    (Indicator::ProductsPerCustomer, &["продукты на клиента", "количество продуктов на клиента", "среднее число продуктов", "продуктовая.*корзина"]),
    (Indicator::CrossSellRate, &["кросс-продажи", "перекрестные продажи", "дополнительные продукты", "кросс.*продажи"]),
    (Indicator::WalletShare, &["доля кошелька", "рыночная доля", "доля рынка", "кошелек.*клиента"]),
    (Indicator::CreditCost, &["стоимость кредитов", "стоимость риска", r"\bкор\b", "резервы.*кредитные убытки", "стоимость.*кредитования", r"\bcredit cost\b"]),
    (Indicator::LoanLossProvisionCoverage, &["резервы под кредитные убытки к проблемным кредитам", "коэффициент резервирования", "покрытие нпл резервами", "резервы.*нпл"]),
    (Indicator::NetInterestIncome, &["чистый процентный доход", "процентный доход.*чистый", r"\bnii\b", "чистые процентные доходы", r"\bnet interest income\b"]),
    (Indicator::SubordinatedDebt, &["субординированный долг", "субординированные обязательства"]),
    (Indicator::InterestEarningAssets, &["процентные активы", "доходные активы", r"\binterest-earning assets\b"]),
    (Indicator::InterestBearingLiabilities, &["процентные обязательства", "доходные обязательства", r"\binterest-bearing liabilities\b"]),
    (Indicator::NetInterestSpread, &["процентный спред", "разница ставок", r"\bnet interest spread\b"]),
    (Indicator::InterbankAssets, &["межбанковские активы", "активы.*межбанк", r"\binterbank assets\b"]),
    (Indicator::InterbankLiabilities, &["межбанковские обязательства", "обязательства.*межбанк", r"\binterbank liabilities\b"]),
    (Indicator::EquityToDebtRatio, &["соотношение собственного капитала к заемному", "капитал.*долг"]),
    (Indicator::RetainedEarningsToTotalAssets, &["соотношение нераспределенной прибыли к активам", "нераспределенная прибыль.*активы"]),
    (Indicator::EbitToTotalAssets, &["соотношение прибыли до вычета процентов и налогов к активам", r"\bebit\b.*активы"]),
    (Indicator::TotalAssetsTurnover, &["оборачиваемость активов", "оборот активов"]),
    (Indicator::ReturnOnNetAssets, &["рентабельность чистых активов", r"\bрна\b", r"return on net assets\s*(\(%\)|%)?\s*$"]),
    (Indicator::ReturnOnAverageTotalAssets, &["рентабельность средних активов", "return on average total assets"]),
    (Indicator::ReturnOnNetAssetsAfterDeductingNonRecurring, &["рентабельность чистых активов после исключения разовых факторов", "return on net assets after deducting non-recurring"]),
    (Indicator::InterbankAssetsToInterestEarningAssets, &["соотношение межбанковских активов к процентным активам", "межбанк.*доходные активы"]),
    (Indicator::DepositsToInterestBearingLiabilities, &["соотношение депозитов к процентным обязательствам", "депозиты.*процентные обязательства"]),
    (Indicator::InterbankLiabilitiesToInterestBearingLiabilities, &["соотношение межбанковских обязательств к процентным обязательствам", "межбанк.*процентные обязательства"]),
    (Indicator::EpsBasic, &[r"\beps\b", "прибыль на акцию"]),
    (Indicator::NonPerformingLoansBalance, &["баланс просроченных кредитов", "balance of non-performing loans"]),
    (Indicator::NumberCorporateOnlineBankingCustomers, &["количество корпоративных клиентов интернет-банка", "число корпоративных клиентов онлайн-банкинга", "number of corporate online banking customers|corporate online banking users"]),
    (Indicator::NumberPersonalOnlineBankingCustomers, &["количество частных клиентов интернет-банка", "число частных клиентов онлайн-банкинга", "number of personal online banking customers|personal online banking users"]),
    (Indicator::NumberMobileBankingCustomers, &["количество пользователей мобильного банкинга", "number of mobile banking customers|mobile banking users"]),
    (Indicator::NumberTelephoneBankingCustomers, &["количество клиентов телефонного банкинга", "number of telephone banking customers|telephone banking users"]),
    (Indicator::TransactionAmountCorporateOnlineBanking, &["объем транзакций корпоративного онлайн-банкинга", "transaction amount of corporate online banking"]),
    (Indicator::TransactionAmountPersonalOnlineBanking, &["объем транзакций частного онлайн-банкинга", "transaction amount of personal online banking"]),
    (Indicator::TransactionAmountMobileBanking, &["объем транзакций мобильного банкинга", "transaction amount of mobile banking"]),
    (Indicator::TransactionAmountSelfServiceBanking, &["объем транзакций через устройства самообслуживания", "transaction amount of self-service banking"]),
    (Indicator::EbankingTransactionVolume, &["объем электронных транзакций", "e-banking transaction volume"]),
    (Indicator::EbankingSubstitutionRatio, &["доля электронных каналов в общем количестве операций", "substitution ratio of e-banking channels"]),
    (Indicator::CustomerSatisfactionLevel, &["уровень удовлетворенности клиентов", "customer satisfaction level"]),
    (Indicator::NumberMobileCashAgents, &["количество агентов мобильного снятия наличных", "number of mobile cash withdrawal agents"]),
    (Indicator::MonthlyActiveMobileBankingCustomers, &["количество активных пользователей мобильного банка в месяц", "monthly active mobile banking customers"]),
];

static DEFAULT_REGISTRY: LazyLock<IndicatorRegistry> = LazyLock::new(|| {
    IndicatorRegistry::from_patterns(DEFAULT_SYNONYMS).expect("built-in synonym patterns are valid")
});

/// Ordered indicator synonym table.
///
/// Patterns are case-insensitive. Matching walks indicators in table order
/// and, within an indicator, patterns in order; the first hit wins.
#[derive(Debug, Clone)]
pub struct IndicatorRegistry {
    entries: Vec<(Indicator, Vec<Regex>)>,
}

impl IndicatorRegistry {
    pub fn from_patterns(defs: &[(Indicator, &[&str])]) -> Result<Self, BankLensError> {
        let mut entries = Vec::with_capacity(defs.len());
        for (indicator, patterns) in defs {
            let compiled = patterns
                .iter()
                .map(|p| {
                    RegexBuilder::new(p)
                        .case_insensitive(true)
                        .build()
                        .map_err(|e| BankLensError::InvalidPattern {
                            indicator: indicator.key().to_string(),
                            reason: e.to_string(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            entries.push((*indicator, compiled));
        }
        Ok(IndicatorRegistry { entries })
    }

    pub fn default_registry() -> &'static IndicatorRegistry {
        &DEFAULT_REGISTRY
    }

    /// Resolve a row label to its indicator.
    pub fn match_indicator(&self, label: &str) -> Option<Indicator> {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|re| re.is_match(&label)))
            .map(|(indicator, _)| *indicator)
    }

    pub fn entries(&self) -> impl Iterator<Item = (Indicator, &[Regex])> {
        self.entries.iter().map(|(i, p)| (*i, p.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
