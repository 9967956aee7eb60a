use dexa_core::error::DexaError;
use dexa_core::generate::Dialect;

pub fn run(dialect: Dialect) -> Result<(), DexaError> {
    for column in dialect.columns() {
        println!("{column}");
    }
    Ok(())
}
