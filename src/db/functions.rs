use diesel::sql_types::Text;

sql_function!(fn lower(string: Text) -> Text);
