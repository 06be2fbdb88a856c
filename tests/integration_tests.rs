//! Integration tests for nexo-cointracking

use nexo_cointracking::{
    utils::{CsvTransactionSource, MemorySink, MemorySource},
    ConvertError, Converter, ConverterConfig, OutputRecord,
};

const HEADER: &str =
    "Transaction,Type,Currency,Amount,USD Equivalent,Details,Outstanding Loan,Date / Time\n";

fn convert_csv(body: &str) -> Result<Vec<OutputRecord>, ConvertError> {
    let data = format!("{}{}", HEADER, body);
    let source = CsvTransactionSource::from_reader(data.as_bytes());
    let mut sink = MemorySink::new();
    Converter::default().convert(source, &mut sink)?;
    Ok(sink.into_records())
}

#[test]
fn test_deposit_and_withdrawal() {
    let rows = convert_csv(
        "\
NXTa,Deposit,BTC,+1.5,$45000.00,approved / BTC deposit,$0.00,2021-01-01 10:00:00
NXTb,Withdrawal,BTC,-0.5,$15000.00,approved / BTC withdrawal,$0.00,2021-01-02 10:00:00
",
    )
    .unwrap();

    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].type_label, "Deposit");
    assert_eq!(rows[0].buy_amount.as_deref(), Some("1.5"));
    assert_eq!(rows[0].buy_currency.as_deref(), Some("BTC"));
    assert_eq!(rows[0].sell_amount, None);

    assert_eq!(rows[1].type_label, "Withdrawal");
    assert_eq!(rows[1].buy_amount, None);
    assert_eq!(rows[1].sell_amount.as_deref(), Some("0.5"));
    assert_eq!(rows[1].sell_currency.as_deref(), Some("BTC"));
}

#[test]
fn test_exchange_becomes_trade() {
    let rows = convert_csv(
        "NXTc,Exchange,BTC/ETH,-1/20,$50000.00,approved / Exchange BTC to ETH,$0.00,2021-02-01 10:00:00\n",
    )
    .unwrap();

    assert_eq!(rows.len(), 1);
    let trade = &rows[0];
    assert_eq!(trade.type_label, "Trade");
    assert_eq!(trade.sell_amount.as_deref(), Some("1"));
    assert_eq!(trade.sell_currency.as_deref(), Some("BTC"));
    assert_eq!(trade.buy_amount.as_deref(), Some("20"));
    assert_eq!(trade.buy_currency.as_deref(), Some("ETH"));
    assert_eq!(trade.comment, "Exchange: approved / Exchange BTC to ETH");
}

#[test]
fn test_liquidation_merged_with_repayment() {
    let rows = convert_csv(
        "\
NXTd,Liquidation,BTC,-2,$61.00,approved / liquidation,$100.00,2021-05-19 10:00:00
NXTe,Repayment,USDTERC,61,$61.00,approved / loan repayment,$40.00,2021-05-19 10:00:05
",
    )
    .unwrap();

    assert_eq!(rows.len(), 1);
    let trade = &rows[0];
    assert_eq!(trade.type_label, "Trade");
    assert_eq!(trade.sell_amount.as_deref(), Some("2"));
    assert_eq!(trade.sell_currency.as_deref(), Some("BTC"));
    assert_eq!(trade.buy_amount.as_deref(), Some("60"));
    assert_eq!(trade.buy_currency.as_deref(), Some("USDT"));
    assert_eq!(trade.comment, "Repayment: approved / loan repayment");
    assert_eq!(trade.date, "2021-05-19 10:00:05");
}

#[test]
fn test_newest_first_export_is_reversed() {
    // Nexo exports newest first; the repayment row comes before its liquidation.
    let rows = convert_csv(
        "\
NXTh,Interest,NEXONEXO,0.5,$1.00,approved / interest,$40.00,2021-05-20 06:00:00
NXTg,Repayment,USDT,60,$60.00,approved / loan repayment,$40.00,2021-05-19 10:00:00
NXTf,Liquidation,BTC,-2,$60.00,approved / liquidation,$100.00,2021-05-19 10:00:00
NXTe,Deposit,BTC,3,$90000.00,approved / deposit,$0.00,2021-05-01 10:00:00
",
    )
    .unwrap();

    let labels: Vec<&str> = rows.iter().map(|r| r.type_label.as_str()).collect();
    assert_eq!(labels, vec!["Deposit", "Trade", "Interest Income"]);
    assert_eq!(rows[2].buy_currency.as_deref(), Some("NEXO"));
}

#[test]
fn test_repayment_without_liquidation_is_rejected() {
    let result = convert_csv(
        "NXTi,Repayment,USDT,60,$60.00,approved / loan repayment,$40.00,2021-05-19 10:00:00\n",
    );

    match result {
        Err(ConvertError::Reconciliation { id, reason }) => {
            assert_eq!(id, "NXTi");
            assert!(reason.contains("liquidation row not found"));
        }
        other => panic!("expected reconciliation error, got {:?}", other),
    }
}

#[test]
fn test_unknown_type_is_rejected() {
    let result = convert_csv(
        "NXTj,ExchangeCashback,BTC,0.001,$30.00,approved / cashback,$0.00,2021-05-19 10:00:00\n",
    );

    assert!(matches!(
        result,
        Err(ConvertError::Classification { ref id, .. }) if id == "NXTj"
    ));
}

#[test]
fn test_wrong_field_count_is_malformed() {
    let result = convert_csv("NXTk,Deposit,BTC,1\n");
    assert!(matches!(
        result,
        Err(ConvertError::MalformedRow { row: 1, .. })
    ));
}

#[test]
fn test_csv_output_layout() {
    let source = MemorySource::from_strs(&[
        &["NXT1", "Deposit", "usdterc", "100", "$100", "approved / deposit", "$0", "2021-01-01 10:00:00"],
        &["NXT2", "TransferIn", "BTC", "1", "$1", "approved / transfer", "$0", "2021-01-02 10:00:00"],
    ]);

    let csv = Converter::default().convert_to_string(source).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Type,Buy,Cur.,Sell,Cur.,Fee,Cur.,Exchange,Group,Comment,Date");
    assert_eq!(
        lines[1],
        "Deposit,100,USDT,,,,,Nexo,,Deposit: approved / deposit,2021-01-01 10:00:00"
    );
}

#[test]
fn test_config_changes_exchange_and_stablecoin() {
    let config = ConverterConfig::from_toml_str(
        "exchange_name = \"Nexo Wallet\"\nstablecoin = \"usdc\"\n",
    )
    .unwrap();
    let source = MemorySource::from_strs(&[
        &["L1", "Liquidation", "ETH", "-1.25", "$80", "approved", "$500.50", "2021-01-01 10:00:00"],
        &["R1", "Repayment", "USDC", "80", "$80", "approved", "$420.25", "2021-01-01 10:00:00"],
    ]);
    let mut sink = MemorySink::new();

    Converter::new(config).convert(source, &mut sink).unwrap();

    let trade = &sink.records()[0];
    assert_eq!(trade.exchange, "Nexo Wallet");
    assert_eq!(trade.buy_amount.as_deref(), Some("80.25"));
    assert_eq!(trade.buy_currency.as_deref(), Some("USDC"));
    assert_eq!(trade.sell_amount.as_deref(), Some("1.25"));
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nexo2ct.toml");
    std::fs::write(&path, "[currency_aliases]\nxbt = \"btc\"\n").unwrap();

    let config = ConverterConfig::load(&path).unwrap();
    assert_eq!(config.normalize_currency("XBT"), "BTC");
}

#[test]
fn test_csv_file_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nexo_transactions.csv");
    std::fs::write(
        &path,
        format!(
            "{}NXT1,Deposit,BTC,1,$1,approved,$0,2021-01-01 10:00:00\n",
            HEADER
        ),
    )
    .unwrap();

    let source = CsvTransactionSource::from_path(&path).unwrap();
    let csv = Converter::default().convert_to_string(source).unwrap();
    assert!(csv.contains("Deposit,1,BTC"));
}
