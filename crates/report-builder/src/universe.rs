//! Curated NSE coverage universe and the peer map behind the comparison table.

use serde::Serialize;

/// One selectable stock in the coverage universe
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ListedStock {
    pub name: &'static str,
    pub ticker: &'static str,
}

/// A sector grouping of the coverage universe
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SectorStocks {
    pub sector: &'static str,
    pub stocks: &'static [ListedStock],
}

const fn stock(name: &'static str, ticker: &'static str) -> ListedStock {
    ListedStock { name, ticker }
}

const BANKING_FINANCIALS: &[ListedStock] = &[
    stock("HDFC Bank", "HDFCBANK.NS"),
    stock("ICICI Bank", "ICICIBANK.NS"),
    stock("State Bank of India", "SBIN.NS"),
    stock("Kotak Mahindra Bank", "KOTAKBANK.NS"),
    stock("Axis Bank", "AXISBANK.NS"),
    stock("Bajaj Finance", "BAJFINANCE.NS"),
];

const IT: &[ListedStock] = &[
    stock("Infosys", "INFY.NS"),
    stock("TCS", "TCS.NS"),
    stock("Wipro", "WIPRO.NS"),
    stock("Tech Mahindra", "TECHM.NS"),
    stock("HCL Technologies", "HCLTECH.NS"),
];

const ENERGY: &[ListedStock] = &[
    stock("Reliance Industries", "RELIANCE.NS"),
    stock("ONGC", "ONGC.NS"),
    stock("NTPC", "NTPC.NS"),
    stock("Power Grid", "POWERGRID.NS"),
    stock("Adani Power", "ADANIPOWER.NS"),
    stock("Tata Power", "TATAPOWER.NS"),
];

const AUTOMOBILES: &[ListedStock] = &[
    stock("Tata Motors", "TATAMOTORS.NS"),
    stock("Mahindra and Mahindra", "M&M.NS"),
    stock("Maruti Suzuki", "MARUTI.NS"),
    stock("Eicher Motors", "EICHERMOT.NS"),
    stock("Bajaj Auto", "BAJAJ-AUTO.NS"),
];

/// Full catalog in display order, for the stock picker
pub fn sector_catalog() -> Vec<SectorStocks> {
    vec![
        SectorStocks {
            sector: "Banking & Financials",
            stocks: BANKING_FINANCIALS,
        },
        SectorStocks {
            sector: "IT",
            stocks: IT,
        },
        SectorStocks {
            sector: "Energy",
            stocks: ENERGY,
        },
        SectorStocks {
            sector: "Automobiles",
            stocks: AUTOMOBILES,
        },
    ]
}

/// Curated peer tickers for the comparison table. Symbols without an
/// entry compare against nobody and the section degrades to a notice.
pub fn peers_for(symbol: &str) -> Vec<String> {
    let peers: &[&str] = match symbol {
        "HDFCBANK.NS" => &["ICICIBANK.NS", "SBIN.NS", "AXISBANK.NS", "KOTAKBANK.NS"],
        "ICICIBANK.NS" => &["HDFCBANK.NS", "AXISBANK.NS", "KOTAKBANK.NS", "SBIN.NS"],
        "SBIN.NS" => &["HDFCBANK.NS", "ICICIBANK.NS", "PNB.NS", "BANKBARODA.NS"],
        "INFY.NS" => &["TCS.NS", "WIPRO.NS", "TECHM.NS", "HCLTECH.NS"],
        "TCS.NS" => &["INFY.NS", "WIPRO.NS", "HCLTECH.NS", "TECHM.NS"],
        "RELIANCE.NS" => &["ONGC.NS", "TATAPOWER.NS", "ADANIPOWER.NS"],
        "TATAMOTORS.NS" => &["MARUTI.NS", "M&M.NS", "EICHERMOT.NS"],
        _ => &[],
    };
    peers.iter().map(|s| s.to_string()).collect()
}
