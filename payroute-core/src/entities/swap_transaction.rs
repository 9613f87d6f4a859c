use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use payroute_sdk::objects::CompletedSwap;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Audit record of a swap executed by the wallet platform.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SwapTransaction {
    pub id: Uuid,
    pub chain_id: i64,
    pub wallet_address: String,
    pub from_token: String,
    pub to_token: String,
    pub input_amount: Decimal,
    pub output_amount: Decimal,
    pub tx_hash: Option<String>,
    pub created_at: time::PrimitiveDateTime,
}

/// Insert one completed swap.
///
/// Addresses are stored lowercased so lookups do not depend on checksum case.
#[derive(Debug, Clone)]
pub struct InsertSwapTransaction {
    pub swap: CompletedSwap,
}

impl Processor<InsertSwapTransaction> for DatabaseProcessor {
    type Output = SwapTransaction;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertSwapTransaction")]
    async fn process(&self, insert: InsertSwapTransaction) -> Result<SwapTransaction, sqlx::Error> {
        let InsertSwapTransaction { swap } = insert;
        let chain_id =
            i64::try_from(swap.chain_id.0).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let record = sqlx::query_as::<_, SwapTransaction>(
            r#"
            INSERT INTO swap_transactions
                (id, chain_id, wallet_address, from_token, to_token, input_amount, output_amount, tx_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING
                id,
                chain_id,
                wallet_address,
                from_token,
                to_token,
                input_amount,
                output_amount,
                tx_hash,
                created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(chain_id)
        .bind(swap.wallet_address.to_lowercase().to_string())
        .bind(swap.from_token.to_lowercase().to_string())
        .bind(swap.to_token.to_lowercase().to_string())
        .bind(swap.input_amount)
        .bind(swap.output_amount)
        .bind(swap.tx_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }
}
