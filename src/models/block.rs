use crate::models::{Address, Amount};

/// A block with its full transaction list, in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub height: u64,
    pub hash: String,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub hash: String,
    pub from: Address,
    /// None for contract creation
    pub to: Option<Address>,
    pub value: Amount,
}

impl Transaction {
    /// True if the address is the sender or the recipient
    pub fn touches(&self, address: &Address) -> bool {
        self.from == *address || self.to.as_ref() == Some(address)
    }

    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }
}

impl Block {
    /// Transactions touching the address, keeping block order
    pub fn transactions_touching<'a>(
        &'a self,
        address: &'a Address,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions.iter().filter(move |tx| tx.touches(address))
    }
}
