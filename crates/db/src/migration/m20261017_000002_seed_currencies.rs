//! Seeds the currency reference table.

use sea_orm_migration::prelude::*;

use super::m20261017_000001_create_tables::Currencies;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// `(code, name, symbol, decimal_places)`
const CURRENCIES: &[(&str, &str, &str, i16)] = &[
    ("USD", "US Dollar", "$", 2),
    ("EUR", "Euro", "€", 2),
    ("GBP", "British Pound", "£", 2),
    ("JPY", "Japanese Yen", "¥", 0),
    ("CNY", "Chinese Yuan", "¥", 2),
    ("CHF", "Swiss Franc", "CHF", 2),
    ("CAD", "Canadian Dollar", "C$", 2),
    ("AUD", "Australian Dollar", "A$", 2),
    ("NZD", "New Zealand Dollar", "NZ$", 2),
    ("HKD", "Hong Kong Dollar", "HK$", 2),
    ("SGD", "Singapore Dollar", "S$", 2),
    ("KRW", "South Korean Won", "₩", 0),
    ("INR", "Indian Rupee", "₹", 2),
    ("IDR", "Indonesian Rupiah", "Rp", 0),
    ("MYR", "Malaysian Ringgit", "RM", 2),
    ("THB", "Thai Baht", "฿", 2),
    ("PHP", "Philippine Peso", "₱", 2),
    ("VND", "Vietnamese Dong", "₫", 0),
    ("SEK", "Swedish Krona", "kr", 2),
    ("NOK", "Norwegian Krone", "kr", 2),
    ("DKK", "Danish Krone", "kr", 2),
    ("PLN", "Polish Zloty", "zł", 2),
    ("CZK", "Czech Koruna", "Kč", 2),
    ("HUF", "Hungarian Forint", "Ft", 0),
    ("TRY", "Turkish Lira", "₺", 2),
    ("RUB", "Russian Ruble", "₽", 2),
    ("BRL", "Brazilian Real", "R$", 2),
    ("MXN", "Mexican Peso", "MX$", 2),
    ("ARS", "Argentine Peso", "AR$", 2),
    ("CLP", "Chilean Peso", "CL$", 0),
    ("ZAR", "South African Rand", "R", 2),
    ("AED", "UAE Dirham", "د.إ", 2),
    ("SAR", "Saudi Riyal", "﷼", 2),
    ("ILS", "Israeli Shekel", "₪", 2),
    ("EGP", "Egyptian Pound", "E£", 2),
    ("NGN", "Nigerian Naira", "₦", 2),
    ("KES", "Kenyan Shilling", "KSh", 2),
    ("BTC", "Bitcoin", "₿", 8),
    ("ETH", "Ether", "Ξ", 6),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert.into_table(Currencies::Table).columns([
            Currencies::Code,
            Currencies::Name,
            Currencies::Symbol,
            Currencies::DecimalPlaces,
            Currencies::IsActive,
        ]);

        for (code, name, symbol, decimal_places) in CURRENCIES {
            insert
                .values([
                    (*code).into(),
                    (*name).into(),
                    (*symbol).into(),
                    (*decimal_places).into(),
                    true.into(),
                ])
                .map_err(|e| DbErr::Custom(e.to_string()))?;
        }

        manager.exec_stmt(insert.to_owned()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let codes = CURRENCIES.iter().map(|(code, ..)| *code);
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Currencies::Table)
                    .and_where(Expr::col(Currencies::Code).is_in(codes))
                    .to_owned(),
            )
            .await
    }
}
