//! Basic conversion example: a newest-first Nexo export with a liquidation

use nexo_cointracking::utils::CsvTransactionSource;
use nexo_cointracking::Converter;

const EXPORT: &str = "\
Transaction,Type,Currency,Amount,USD Equivalent,Details,Outstanding Loan,Date / Time
NXT6,Interest,NEXONEXO,0.84,$1.52,approved / 0.84 NEXO interest earned,$3150.00,2021-05-21 06:00:04
NXT5,Repayment,USDTERC,1850.12,$1850.12,approved / Loan repayment from liquidation,$3150.00,2021-05-19 14:02:11
NXT4,Liquidation,BTC,-0.05,$1850.12,approved / Collateral liquidated,$5000.00,2021-05-19 14:02:11
NXT3,Exchange,ETH/BTC,-2/0.12,$7200.00,approved / Exchange ETH to BTC,$5000.00,2021-05-10 09:30:00
NXT2,WithdrawalCredit,USDTERC,-5000,$5000.00,approved / Credit line withdrawal,$5000.00,2021-05-02 12:00:00
NXT1,Deposit,ETH,4,$11000.00,approved / ETH deposit,$0.00,2021-05-01 08:15:00
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Nexo -> CoinTracking conversion example\n");

    let source = CsvTransactionSource::from_reader(EXPORT.as_bytes());
    let csv = Converter::default().convert_to_string(source)?;

    print!("{}", csv);
    Ok(())
}
